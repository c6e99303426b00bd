//! Special commands parser for interactive chat mode
//!
//! Special commands let the user edit soil parameters, pick sample
//! questions, inspect the services and manage the session without sending
//! anything to the chat pipeline.
//!
//! Commands are prefixed with `/` and the command word is case-insensitive.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Overwrite one soil parameter: `/set <field> <value>`
    SetParameter { name: String, value: String },

    /// Show the current soil parameters
    ShowParameters,

    /// Range-check the current soil parameters
    Validate,

    /// List the sample questions
    ListSamples,

    /// Copy sample question `n` (1-based) into the input line
    SelectSample(usize),

    /// Start a new session (clears the transcript)
    NewSession,

    /// Print the whole transcript
    History,

    /// Query the prediction service health endpoint
    Health,

    /// Show the prediction the service holds for this client
    LatestPrediction,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command; the input is a chat message
    None,
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` if input starts with "/" but is not a valid command,
/// `CommandError::MissingArgument` if a required argument is absent, and
/// `CommandError::UnsupportedArgument` if an argument cannot be used.
///
/// # Examples
///
/// ```
/// use agronus::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// let cmd = parse_special_command("/set nitrogen 120").unwrap();
/// assert_eq!(
///     cmd,
///     SpecialCommand::SetParameter { name: "nitrogen".to_string(), value: "120".to_string() }
/// );
///
/// let cmd = parse_special_command("What crop is best for my soil?").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    // If input doesn't start with "/", it's not a command (except exit/quit)
    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    let mut parts = trimmed.split_whitespace();
    let command = parts.next().unwrap_or_default().to_lowercase();
    let args: Vec<&str> = parts.collect();

    match command.as_str() {
        "/set" => match args.as_slice() {
            [name, value] => Ok(SpecialCommand::SetParameter {
                name: name.to_string(),
                value: value.to_string(),
            }),
            [] | [_] => Err(CommandError::MissingArgument {
                command: "/set".to_string(),
                usage: "/set <field> <value>".to_string(),
            }),
            [_, _, extra @ ..] => Err(CommandError::UnsupportedArgument {
                command: "/set".to_string(),
                arg: extra.join(" "),
            }),
        },

        "/params" | "/soil" => no_args("/params", &args, SpecialCommand::ShowParameters),
        "/validate" => no_args("/validate", &args, SpecialCommand::Validate),
        "/samples" => no_args("/samples", &args, SpecialCommand::ListSamples),

        "/sample" => match args.as_slice() {
            [] => Err(CommandError::MissingArgument {
                command: "/sample".to_string(),
                usage: "/sample <number>".to_string(),
            }),
            [n] => match n.parse::<usize>() {
                Ok(index) if index > 0 => Ok(SpecialCommand::SelectSample(index)),
                _ => Err(CommandError::UnsupportedArgument {
                    command: "/sample".to_string(),
                    arg: n.to_string(),
                }),
            },
            _ => Err(CommandError::UnsupportedArgument {
                command: "/sample".to_string(),
                arg: args.join(" "),
            }),
        },

        "/new" | "/reset" => no_args("/new", &args, SpecialCommand::NewSession),
        "/history" => no_args("/history", &args, SpecialCommand::History),
        "/health" => no_args("/health", &args, SpecialCommand::Health),
        "/prediction" => no_args("/prediction", &args, SpecialCommand::LatestPrediction),
        "/help" | "/?" => Ok(SpecialCommand::Help),

        // Exit commands
        "exit" | "quit" | "/exit" | "/quit" => Ok(SpecialCommand::Exit),

        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

fn no_args(
    command: &str,
    args: &[&str],
    cmd: SpecialCommand,
) -> Result<SpecialCommand, CommandError> {
    if args.is_empty() {
        Ok(cmd)
    } else {
        Err(CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: args.join(" "),
        })
    }
}

/// Display help text for special commands
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat Mode
===========================================

SOIL CONDITIONS:
  /set <field> <value> - Update one parameter (nitrogen, phosphorus, potassium,
                         temperature, humidity, ph, rainfall)
  /params              - Show the current soil parameters
  /validate            - Check parameters against agronomic ranges

QUESTIONS:
  /samples             - List sample questions
  /sample <n>          - Put sample question <n> on the input line

SERVICES:
  /health              - Show prediction service health
  /prediction          - Show the prediction stored for this session

SESSION CONTROL:
  /history             - Print the conversation so far
  /new                 - Start a new session (soil parameters are kept)
  /help                - Show this help message
  exit                 - Exit interactive mode
  quit                 - Same as exit

NOTES:
  - Regular text (not starting with /) is sent as a question
  - Every question sends the current soil parameters first
"#
    );
}
