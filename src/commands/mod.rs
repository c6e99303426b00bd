/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `chat`: Interactive chat session
- `ask`: One question, one printed reply
- `validate`: Offline range check of soil parameters
- `diagnostics`: Prediction service health and latest prediction

Handlers build an [`HttpFarmServices`] from the loaded configuration and
drive a [`ChatSession`] or query the services directly.
*/

use crate::chat_view;
use crate::cli::SoilArgs;
use crate::config::Config;
use crate::error::Result;
use crate::services::HttpFarmServices;
use crate::session::ChatSession;
use std::sync::Arc;

// Special commands parser for the interactive session
pub mod special_commands;

/// Build the service client and session for a run
///
/// Soil flags from the command line replace the configured defaults.
fn start_session(config: &Config, soil: &SoilArgs) -> Result<(Arc<HttpFarmServices>, ChatSession)> {
    let services = Arc::new(HttpFarmServices::new(&config.services)?);
    let mut session_config = config.session.clone();
    session_config.soil = soil.apply_to(session_config.soil);
    let session = ChatSession::new(services.clone(), &session_config);
    Ok((services, session))
}

// Chat command handler
pub mod chat {
    //! Interactive chat session handler.
    //!
    //! Runs a readline loop: special commands act on the session locally,
    //! anything else is submitted through the context → prompt → answer
    //! chain and the reply is printed.

    use super::*;
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// What the loop should do after a special command
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum CommandOutcome {
        /// Print this text and keep reading
        Output(String),
        /// Print the command help and keep reading
        Help,
        /// Leave the session
        Exit,
    }

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration
    /// * `soil` - Soil parameter overrides from the command line
    ///
    /// # Errors
    ///
    /// Returns error if the service client or the line editor cannot be
    /// created
    pub async fn run_chat(config: Config, soil: SoilArgs) -> Result<()> {
        let (services, mut session) = start_session(&config, &soil)?;
        let mut rl = DefaultEditor::new()?;

        println!(
            "{}",
            chat_view::welcome_banner(services.prediction_url(), services.chat_url())
        );
        for message in session.conversation() {
            println!("{}\n", chat_view::format_message(message));
        }
        print_samples_hint(&session);

        loop {
            let prompt = chat_view::format_prompt();
            let initial = session.input().to_string();
            let readline = if initial.is_empty() {
                rl.readline(&prompt)
            } else {
                rl.readline_with_initial(&prompt, (initial.as_str(), ""))
            };

            match readline {
                Ok(line) => {
                    if line.trim().is_empty() {
                        session.set_input("");
                        continue;
                    }

                    match parse_special_command(&line) {
                        Ok(SpecialCommand::None) => {}
                        Ok(command) => {
                            session.set_input("");
                            match handle_command(&mut session, &services, command).await {
                                CommandOutcome::Output(text) => println!("{}\n", text),
                                CommandOutcome::Help => print_help(),
                                CommandOutcome::Exit => break,
                            }
                            continue;
                        }
                        Err(e) => {
                            session.set_input("");
                            eprintln!("{}\n", e);
                            continue;
                        }
                    }

                    rl.add_history_entry(line.trim())?;
                    session.set_input(line);

                    println!("{}", chat_view::thinking_indicator());
                    if session.submit_input().await {
                        if let Some(reply) = session.conversation().last() {
                            println!("\n{}\n", chat_view::format_message(reply));
                        }
                    }
                    print_samples_hint(&session);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn print_samples_hint(session: &ChatSession) {
        if session.shows_samples() && !session.sample_questions().is_empty() {
            println!(
                "Try one of these (use /sample <n>):\n{}\n",
                chat_view::format_samples(session.sample_questions())
            );
        }
    }

    /// Apply one special command to the session
    ///
    /// Service diagnostics that fail are reported as output; the session
    /// keeps running.
    pub async fn handle_command(
        session: &mut ChatSession,
        services: &HttpFarmServices,
        command: SpecialCommand,
    ) -> CommandOutcome {
        let text = match command {
            SpecialCommand::SetParameter { name, value } => {
                match session.update_parameter(&name, &value) {
                    Ok(field) => format!("{} set to {}", field.label(), session.soil().get(field)),
                    Err(e) => format!("Error: {}", e),
                }
            }
            SpecialCommand::ShowParameters => chat_view::format_soil_table(session.soil()),
            SpecialCommand::Validate => chat_view::format_issues(&session.soil().validate()),
            SpecialCommand::ListSamples => chat_view::format_samples(session.sample_questions()),
            SpecialCommand::SelectSample(n) => {
                let selected = match n.checked_sub(1) {
                    Some(index) => session.select_sample_at(index).map(str::to_string),
                    None => None,
                };
                match selected {
                    Some(question) => format!("Selected: {}", question),
                    None => format!(
                        "No sample question {} (there are {})",
                        n,
                        session.sample_questions().len()
                    ),
                }
            }
            SpecialCommand::NewSession => {
                if session.new_session() {
                    session
                        .conversation()
                        .last()
                        .map(chat_view::format_message)
                        .unwrap_or_default()
                } else {
                    "A question is still being answered; try again when it finishes".to_string()
                }
            }
            SpecialCommand::History => chat_view::format_transcript(session),
            SpecialCommand::Health => match services.health().await {
                Ok(health) => chat_view::format_health(&health),
                Err(e) => format!("Error: {}", e),
            },
            SpecialCommand::LatestPrediction => match services.latest_prediction().await {
                Ok(latest) => chat_view::format_latest_prediction(latest.as_ref()),
                Err(e) => format!("Error: {}", e),
            },
            SpecialCommand::Help => return CommandOutcome::Help,
            SpecialCommand::Exit => return CommandOutcome::Exit,
            SpecialCommand::None => String::new(),
        };
        CommandOutcome::Output(text)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::config::Config;

        fn offline() -> (Arc<HttpFarmServices>, ChatSession) {
            let mut config = Config::default();
            config.services.prediction_url = "http://127.0.0.1:9".to_string();
            config.services.chat_url = "http://127.0.0.1:9".to_string();
            start_session(&config, &SoilArgs::default()).unwrap()
        }

        #[tokio::test]
        async fn test_set_parameter_updates_soil() {
            let (services, mut session) = offline();
            let outcome = handle_command(
                &mut session,
                &services,
                SpecialCommand::SetParameter {
                    name: "ph".to_string(),
                    value: "7.2".to_string(),
                },
            )
            .await;
            assert_eq!(session.soil().ph_level, 7.2);
            assert!(matches!(outcome, CommandOutcome::Output(text) if text.contains("7.2")));
        }

        #[tokio::test]
        async fn test_set_parameter_unknown_field_reports_error() {
            let (services, mut session) = offline();
            let before = *session.soil();
            let outcome = handle_command(
                &mut session,
                &services,
                SpecialCommand::SetParameter {
                    name: "salinity".to_string(),
                    value: "3".to_string(),
                },
            )
            .await;
            assert_eq!(*session.soil(), before);
            assert!(matches!(outcome, CommandOutcome::Output(text) if text.starts_with("Error:")));
        }

        #[tokio::test]
        async fn test_set_parameter_rejects_nan() {
            let (services, mut session) = offline();
            let outcome = handle_command(
                &mut session,
                &services,
                SpecialCommand::SetParameter {
                    name: "nitrogen".to_string(),
                    value: "NaN".to_string(),
                },
            )
            .await;
            assert_eq!(session.soil().nitrogen, 90.0);
            assert!(matches!(outcome, CommandOutcome::Output(text) if text.starts_with("Error:")));
        }

        #[tokio::test]
        async fn test_select_sample_fills_input() {
            let (services, mut session) = offline();
            let first = session.sample_questions()[0].clone();
            handle_command(&mut session, &services, SpecialCommand::SelectSample(1)).await;
            assert_eq!(session.input(), first);
            assert_eq!(session.conversation().len(), 1);
        }

        #[tokio::test]
        async fn test_select_sample_out_of_range() {
            let (services, mut session) = offline();
            let outcome =
                handle_command(&mut session, &services, SpecialCommand::SelectSample(99)).await;
            assert!(matches!(outcome, CommandOutcome::Output(text) if text.contains("No sample question 99")));
            assert_eq!(session.input(), "");
        }

        #[tokio::test]
        async fn test_new_session_resets_transcript() {
            let (services, mut session) = offline();
            session.submit("hello").await;
            assert_eq!(session.conversation().len(), 3);
            let outcome =
                handle_command(&mut session, &services, SpecialCommand::NewSession).await;
            assert_eq!(session.conversation().len(), 1);
            assert!(matches!(outcome, CommandOutcome::Output(text) if text.contains("Ready! Inputs updated.")));
        }

        #[tokio::test]
        async fn test_health_failure_is_reported_not_raised() {
            let (services, mut session) = offline();
            let outcome = handle_command(&mut session, &services, SpecialCommand::Health).await;
            assert!(matches!(outcome, CommandOutcome::Output(text) if text.starts_with("Error:")));
        }

        #[tokio::test]
        async fn test_help_and_exit() {
            let (services, mut session) = offline();
            assert_eq!(
                handle_command(&mut session, &services, SpecialCommand::Help).await,
                CommandOutcome::Help
            );
            assert_eq!(
                handle_command(&mut session, &services, SpecialCommand::Exit).await,
                CommandOutcome::Exit
            );
        }
    }
}

// One-shot question handler
pub mod ask {
    use super::*;

    /// Submit one question and print the `ai` reply
    ///
    /// A failing service chain still prints the fixed error reply and
    /// returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns error if the question is blank or the service client cannot
    /// be created
    pub async fn run_ask(config: Config, question: String, soil: SoilArgs) -> Result<()> {
        let reply = ask_question(&config, &question, &soil).await?;
        println!("{}", reply);
        Ok(())
    }

    /// Submit one question and return the reply text
    ///
    /// # Errors
    ///
    /// Returns error if the question is blank or the service client cannot
    /// be created
    pub async fn ask_question(config: &Config, question: &str, soil: &SoilArgs) -> Result<String> {
        let (_services, mut session) = start_session(config, soil)?;
        tracing::debug!("Asking with soil {}", session.soil().summary());
        if !session.submit(question).await {
            anyhow::bail!("Question must not be blank");
        }
        Ok(session
            .conversation()
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default())
    }

}

// Offline validation handler
pub mod validate {
    use super::*;

    /// Print the soil parameters and any range issues
    ///
    /// Returns `true` when every parameter is within range.
    pub fn run_validate(config: &Config, soil: &SoilArgs) -> bool {
        let soil = soil.apply_to(config.session.soil);
        let issues = soil.validate();
        println!("{}", chat_view::format_soil_table(&soil));
        println!("{}", chat_view::format_issues(&issues));
        if !issues.is_empty() {
            tracing::warn!("{} soil parameter(s) out of range", issues.len());
        }
        issues.is_empty()
    }

}

// Service diagnostics handlers
pub mod diagnostics {
    use super::*;

    /// Print the prediction service health
    ///
    /// # Errors
    ///
    /// Returns error if the service is unreachable or answers with an error
    pub async fn run_health(config: Config) -> Result<()> {
        let services = HttpFarmServices::new(&config.services)?;
        let health = services.health().await?;
        println!("{}", chat_view::format_health(&health));
        Ok(())
    }

    /// Print the latest prediction stored by the prediction service
    ///
    /// The service keys stored predictions by client address, so this shows
    /// the prediction left by an earlier `ask` or `chat` from the same host.
    ///
    /// # Errors
    ///
    /// Returns error if the service is unreachable or answers with an error
    pub async fn run_prediction(config: Config) -> Result<()> {
        let services = HttpFarmServices::new(&config.services)?;
        let latest = services.latest_prediction().await?;
        println!("{}", chat_view::format_latest_prediction(latest.as_ref()));
        Ok(())
    }
}
