//! Agronus - soil-aware crop recommendation chat library
//!
//! This library provides the core of Agronus: a chat session that, for
//! every question, sends the farmer's soil parameters to a prediction
//! service, turns the question into a context-aware prompt, and asks a
//! recommendation chat service for the answer.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: Chat session state, transcript and the submission chain
//! - `services`: The `FarmServices` seam and its HTTP implementation
//! - `soil`: Soil parameters, field names and range validation
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//! - `commands`: Handlers for the CLI commands
//! - `chat_view`: Terminal rendering of the session
//!
//! # Example
//!
//! ```no_run
//! use agronus::{ChatSession, Config, HttpFarmServices};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let services = Arc::new(HttpFarmServices::new(&config.services)?);
//!     let mut session = ChatSession::new(services, &config.session);
//!     session.submit("What crop is best for my soil?").await;
//!     Ok(())
//! }
//! ```

pub mod chat_view;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod services;
pub mod session;
pub mod soil;

// Re-export commonly used types
pub use config::Config;
pub use error::{AgronusError, Result};
pub use services::{FarmServices, HttpFarmServices};
pub use session::{ChatSession, Conversation, Message, Reply, Role};
pub use soil::{SoilField, SoilParameters};

#[cfg(test)]
pub mod test_utils;
