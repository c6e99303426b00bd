//! Clients for the external farm services
//!
//! The chat session talks to two collaborators: the prediction service,
//! which records the soil context and turns a raw question into a prompt,
//! and the chat/RAG service, which answers that prompt. Both sit behind the
//! [`FarmServices`] trait so the session can be driven by the HTTP client
//! in production and by a scripted fake in tests.

pub mod http;
pub mod types;

pub use http::HttpFarmServices;
pub use types::{HealthStatus, LatestPrediction, PredictionAck};

use crate::error::Result;
use crate::soil::SoilParameters;
use async_trait::async_trait;

/// The three calls a chat submission makes, in order
#[async_trait]
pub trait FarmServices: Send + Sync {
    /// Send the soil snapshot so the prediction service can derive context
    ///
    /// # Errors
    ///
    /// Returns error on network failure or a non-success status
    async fn submit_context(&self, soil: &SoilParameters) -> Result<PredictionAck>;

    /// Turn the user's raw text into a prompt for the language model
    ///
    /// # Errors
    ///
    /// Returns error on network failure, a non-success status, or a
    /// response without a `prompt` string
    async fn transform_query(&self, text: &str) -> Result<String>;

    /// Ask the chat service to answer a prompt
    ///
    /// `Ok(None)` means the service replied without an answer.
    ///
    /// # Errors
    ///
    /// Returns error on network failure, a non-success status, or a body
    /// that is not JSON
    async fn generate_answer(&self, prompt: &str) -> Result<Option<String>>;
}
