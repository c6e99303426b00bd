//! Configuration management for Agronus
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{AgronusError, Result};
use crate::soil::SoilParameters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for Agronus
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Addresses of the prediction and chat services
    #[serde(default)]
    pub services: ServicesConfig,
    /// Chat session behavior
    #[serde(default)]
    pub session: SessionConfig,
}

/// Service endpoint configuration
///
/// Both services may live on the same host (the combined deployment serves
/// `/predict`, `/userQuery` and `/chat` from one process).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// Base URL of the prediction service (`/predict`, `/userQuery`)
    #[serde(default = "default_prediction_url")]
    pub prediction_url: String,

    /// Base URL of the chat/RAG service (`/chat`)
    #[serde(default = "default_chat_url")]
    pub chat_url: String,

    /// Optional per-request timeout in seconds; unset means wait indefinitely
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

fn default_prediction_url() -> String {
    "http://127.0.0.1:5001".to_string()
}

fn default_chat_url() -> String {
    "http://127.0.0.1:5002".to_string()
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            prediction_url: default_prediction_url(),
            chat_url: default_chat_url(),
            timeout_seconds: None,
        }
    }
}

impl ServicesConfig {
    /// Request timeout, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

/// Chat session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// System message shown when the session starts
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// System message shown after "new session"
    #[serde(default = "default_reset_greeting")]
    pub reset_greeting: String,

    /// Canned questions offered before the conversation gets going
    #[serde(default = "default_sample_questions")]
    pub sample_questions: Vec<String>,

    /// Initial soil parameters
    #[serde(default)]
    pub soil: SoilParameters,
}

fn default_greeting() -> String {
    "Hello! I'm Agronus. Please fill in your soil details in the sidebar to get accurate recommendations."
        .to_string()
}

fn default_reset_greeting() -> String {
    "Ready! Inputs updated.".to_string()
}

fn default_sample_questions() -> Vec<String> {
    vec![
        "What crop is best for my soil?".to_string(),
        "How much fertilizer should I use?".to_string(),
        "Is my rainfall sufficient for Rice?".to_string(),
        "Suggest a crop rotation plan.".to_string(),
    ]
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            reset_greeting: default_reset_greeting(),
            sample_questions: default_sample_questions(),
            soil: SoilParameters::default(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error: defaults are used and a warning is
    /// logged.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AgronusError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| AgronusError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(url) = std::env::var("AGRONUS_PREDICTION_URL") {
            self.services.prediction_url = url;
        }

        if let Ok(url) = std::env::var("AGRONUS_CHAT_URL") {
            self.services.chat_url = url;
        }

        if let Ok(timeout) = std::env::var("AGRONUS_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.services.timeout_seconds = Some(value);
            } else {
                tracing::warn!("Invalid AGRONUS_TIMEOUT_SECONDS: {}", timeout);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(url) = &cli.prediction_url {
            tracing::debug!("Prediction service override from CLI: {}", url);
            self.services.prediction_url = url.clone();
        }
        if let Some(url) = &cli.chat_url {
            tracing::debug!("Chat service override from CLI: {}", url);
            self.services.chat_url = url.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if a service URL is not an absolute http(s) URL, the
    /// timeout is zero, or a sample question is blank
    pub fn validate(&self) -> Result<()> {
        validate_service_url("services.prediction_url", &self.services.prediction_url)?;
        validate_service_url("services.chat_url", &self.services.chat_url)?;

        if self.services.timeout_seconds == Some(0) {
            return Err(AgronusError::Config(
                "services.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self
            .session
            .sample_questions
            .iter()
            .any(|q| q.trim().is_empty())
        {
            return Err(AgronusError::Config(
                "session.sample_questions cannot contain empty entries".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

fn validate_service_url(key: &str, value: &str) -> Result<()> {
    let url = url::Url::parse(value)
        .map_err(|e| AgronusError::Config(format!("Invalid {}: {} ({})", key, value, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(AgronusError::Config(format!(
            "Invalid {}: unsupported scheme {}. Must be one of: http, https",
            key, other
        ))
        .into()),
    }
}
