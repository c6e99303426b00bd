//! Agronus - soil-aware crop recommendation chat
//!
#![doc = "Agronus - soil-aware crop recommendation chat"]
#![doc = "Main entry point for the Agronus application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use agronus::cli::{Cli, Commands};
use agronus::commands;
use agronus::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { soil } => {
            tracing::info!("Starting interactive chat session");
            commands::chat::run_chat(config, soil).await?;
            Ok(())
        }
        Commands::Ask { question, soil } => {
            tracing::debug!("Asking: {}", question);
            commands::ask::run_ask(config, question, soil).await?;
            Ok(())
        }
        Commands::Validate { soil } => {
            if !commands::validate::run_validate(&config, &soil) {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Health => {
            commands::diagnostics::run_health(config).await?;
            Ok(())
        }
        Commands::Prediction => {
            commands::diagnostics::run_prediction(config).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "agronus=debug" } else { "agronus=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
