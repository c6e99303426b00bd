//! Command-line interface definition for Agronus
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, one-shot questions, offline
//! validation and service diagnostics.

use crate::soil::{self, SoilField, SoilParameters};
use clap::{Args, Parser, Subcommand};

/// Agronus - soil-aware crop recommendation chat
///
/// Sends your soil conditions to the prediction service and your
/// questions to the recommendation chat service.
#[derive(Parser, Debug, Clone)]
#[command(name = "agronus")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the prediction service base URL
    #[arg(long, global = true)]
    pub prediction_url: Option<String>,

    /// Override the chat service base URL
    #[arg(long, global = true)]
    pub chat_url: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Agronus
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        #[command(flatten)]
        soil: SoilArgs,
    },

    /// Ask a single question and print the reply
    Ask {
        /// Question to send
        question: String,

        #[command(flatten)]
        soil: SoilArgs,
    },

    /// Check soil parameters against agronomic ranges
    Validate {
        #[command(flatten)]
        soil: SoilArgs,
    },

    /// Show prediction service health
    Health,

    /// Show the latest prediction stored by the prediction service
    Prediction,
}

/// Soil parameter overrides
///
/// Each flag replaces the configured value for that field.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct SoilArgs {
    /// Nitrogen (N), kg/ha
    #[arg(long, value_parser = finite_number)]
    pub nitrogen: Option<f64>,

    /// Phosphorus (P), kg/ha
    #[arg(long, value_parser = finite_number)]
    pub phosphorus: Option<f64>,

    /// Potassium (K), kg/ha
    #[arg(long, value_parser = finite_number)]
    pub potassium: Option<f64>,

    /// Temperature, °C
    #[arg(long, allow_negative_numbers = true, value_parser = finite_number)]
    pub temperature: Option<f64>,

    /// Relative humidity, %
    #[arg(long, value_parser = finite_number)]
    pub humidity: Option<f64>,

    /// Soil pH
    #[arg(long = "ph", value_parser = finite_number)]
    pub ph_level: Option<f64>,

    /// Rainfall, mm
    #[arg(long, value_parser = finite_number)]
    pub rainfall: Option<f64>,
}

/// Parse a soil flag value, rejecting `NaN` and infinities
fn finite_number(value: &str) -> Result<f64, String> {
    soil::parse_value(value).ok_or_else(|| format!("`{}` is not a finite number", value))
}

impl SoilArgs {
    /// Apply the given flags on top of `base`
    pub fn apply_to(&self, base: SoilParameters) -> SoilParameters {
        let mut soil = base;
        let overrides = [
            (SoilField::Nitrogen, self.nitrogen),
            (SoilField::Phosphorus, self.phosphorus),
            (SoilField::Potassium, self.potassium),
            (SoilField::Temperature, self.temperature),
            (SoilField::Humidity, self.humidity),
            (SoilField::PhLevel, self.ph_level),
            (SoilField::Rainfall, self.rainfall),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                soil.set(field, value);
            }
        }
        soil
    }
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            prediction_url: None,
            chat_url: None,
            command: Commands::Chat {
                soil: SoilArgs::default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert!(cli.prediction_url.is_none());
        assert!(matches!(cli.command, Commands::Chat { .. }));
    }

    #[test]
    fn test_cli_parse_chat_command() {
        let cli = Cli::try_parse_from(["agronus", "chat"]).unwrap();
        if let Commands::Chat { soil } = cli.command {
            assert_eq!(soil, SoilArgs::default());
        } else {
            panic!("Expected Chat command");
        }
    }

    #[test]
    fn test_cli_parse_ask_with_soil_flags() {
        let cli = Cli::try_parse_from([
            "agronus",
            "ask",
            "Which crop suits my soil?",
            "--nitrogen",
            "120",
            "--ph",
            "5.5",
        ])
        .unwrap();
        if let Commands::Ask { question, soil } = cli.command {
            assert_eq!(question, "Which crop suits my soil?");
            assert_eq!(soil.nitrogen, Some(120.0));
            assert_eq!(soil.ph_level, Some(5.5));
            assert_eq!(soil.rainfall, None);
        } else {
            panic!("Expected Ask command");
        }
    }

    #[test]
    fn test_cli_parse_ask_requires_question() {
        assert!(Cli::try_parse_from(["agronus", "ask"]).is_err());
    }

    #[test]
    fn test_cli_parse_negative_temperature() {
        let cli = Cli::try_parse_from(["agronus", "validate", "--temperature", "-5"]).unwrap();
        if let Commands::Validate { soil } = cli.command {
            assert_eq!(soil.temperature, Some(-5.0));
        } else {
            panic!("Expected Validate command");
        }
    }

    #[test]
    fn test_cli_parse_service_urls_after_subcommand() {
        let cli = Cli::try_parse_from([
            "agronus",
            "health",
            "--prediction-url",
            "http://farm.local:5001",
        ])
        .unwrap();
        assert_eq!(cli.prediction_url.as_deref(), Some("http://farm.local:5001"));
        assert!(matches!(cli.command, Commands::Health));
    }

    #[test]
    fn test_cli_parse_with_config_and_verbose() {
        let cli = Cli::try_parse_from(["agronus", "-v", "--config", "custom.yaml", "prediction"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some("custom.yaml".to_string()));
        assert!(matches!(cli.command, Commands::Prediction));
    }

    #[test]
    fn test_cli_parse_missing_command() {
        assert!(Cli::try_parse_from(["agronus"]).is_err());
    }

    #[test]
    fn test_cli_parse_rejects_non_numeric_soil_value() {
        assert!(Cli::try_parse_from(["agronus", "validate", "--humidity", "wet"]).is_err());
    }

    #[test]
    fn test_cli_parse_rejects_non_finite_soil_value() {
        for value in ["NaN", "inf", "-infinity"] {
            assert!(
                Cli::try_parse_from(["agronus", "validate", "--nitrogen", value]).is_err(),
                "{} should be rejected",
                value
            );
        }
    }

    #[test]
    fn test_soil_args_apply_to_overrides_only_given_fields() {
        let args = SoilArgs {
            humidity: Some(55.0),
            rainfall: Some(100.0),
            ..SoilArgs::default()
        };
        let soil = args.apply_to(SoilParameters::default());
        assert_eq!(soil.humidity, 55.0);
        assert_eq!(soil.rainfall, 100.0);
        assert_eq!(soil.nitrogen, SoilParameters::default().nitrogen);
    }
}
