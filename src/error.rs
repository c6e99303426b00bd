//! Error types for Agronus
//!
//! This module defines the error types used throughout the client,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Agronus operations
///
/// Covers configuration loading, soil parameter edits, and the calls made
/// to the prediction and chat services.
#[derive(Error, Debug)]
pub enum AgronusError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Prediction or chat service errors (status codes, missing fields)
    #[error("Service error: {0}")]
    Service(String),

    /// A soil parameter name that does not match any field
    #[error("Unknown soil parameter: {0}")]
    UnknownParameter(String),

    /// A soil parameter value that is not a number
    #[error("Invalid value for {field}: {value}")]
    InvalidParameter {
        /// Field the value was meant for
        field: String,
        /// The rejected raw value
        value: String,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed service URL
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type alias for Agronus operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
