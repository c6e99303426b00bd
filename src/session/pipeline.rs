//! The three-step request chain behind every chat submission
//!
//! Each step takes the previous step's typed output, so the order
//! context → prompt → answer cannot be rearranged:
//!
//! ```text
//! SoilParameters --submit_context--> ContextAck
//! ContextAck + text --transform_query--> TransformedPrompt
//! TransformedPrompt --generate_answer--> Reply
//! ```
//!
//! The first failing step short-circuits the rest. Failures are collapsed
//! into [`Reply::Failed`]; the step and cause only reach the log.

use crate::services::{FarmServices, PredictionAck};
use crate::session::conversation::Message;
use crate::soil::SoilParameters;
use std::fmt;
use thiserror::Error;

/// Shown when the chat service answers without any text
pub const NO_ANSWER_MESSAGE: &str = "I couldn't find an answer to that.";

/// Shown when any step of the chain fails
pub const CONNECTION_ERROR_MESSAGE: &str =
    "Sorry, I encountered an error connecting to the farm server.";

/// Position of a step in the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    ContextSubmission,
    QueryTransformation,
    AnswerGeneration,
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContextSubmission => write!(f, "context submission"),
            Self::QueryTransformation => write!(f, "query transformation"),
            Self::AnswerGeneration => write!(f, "answer generation"),
        }
    }
}

/// A step failed; carries the step for diagnostics
#[derive(Debug, Error)]
#[error("{step} failed: {detail}")]
pub struct PipelineError {
    pub step: PipelineStep,
    pub detail: String,
}

impl PipelineError {
    fn at(step: PipelineStep, err: anyhow::Error) -> Self {
        Self {
            step,
            detail: format!("{:#}", err),
        }
    }
}

/// Proof that the prediction service has received the soil context
#[derive(Debug, Clone)]
pub struct ContextAck(pub PredictionAck);

/// Prompt produced by the query transformation step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedPrompt(pub String);

/// Outcome of one submission, as it will appear in the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The chat service answered
    Answer(String),
    /// The chain succeeded but the answer was missing or empty
    NoAnswer,
    /// Some step failed
    Failed,
}

impl Reply {
    /// Text shown to the user
    pub fn content(&self) -> &str {
        match self {
            Self::Answer(text) => text,
            Self::NoAnswer => NO_ANSWER_MESSAGE,
            Self::Failed => CONNECTION_ERROR_MESSAGE,
        }
    }

    /// The `ai` message appended for this reply
    pub fn to_message(&self) -> Message {
        Message::ai(self.content())
    }
}

/// Step A: hand the soil snapshot to the prediction service
pub async fn submit_context(
    services: &dyn FarmServices,
    soil: &SoilParameters,
) -> Result<ContextAck, PipelineError> {
    services
        .submit_context(soil)
        .await
        .map(ContextAck)
        .map_err(|e| PipelineError::at(PipelineStep::ContextSubmission, e))
}

/// Step B: turn the raw text into a prompt
///
/// Requires the acknowledgement from step A; the service reads the context
/// recorded there.
pub async fn transform_query(
    services: &dyn FarmServices,
    _context: &ContextAck,
    text: &str,
) -> Result<TransformedPrompt, PipelineError> {
    services
        .transform_query(text)
        .await
        .map(TransformedPrompt)
        .map_err(|e| PipelineError::at(PipelineStep::QueryTransformation, e))
}

/// Step C: ask the chat service to answer the prompt
pub async fn generate_answer(
    services: &dyn FarmServices,
    prompt: TransformedPrompt,
) -> Result<Reply, PipelineError> {
    let answer = services
        .generate_answer(&prompt.0)
        .await
        .map_err(|e| PipelineError::at(PipelineStep::AnswerGeneration, e))?;
    Ok(match answer {
        Some(text) if !text.is_empty() => Reply::Answer(text),
        _ => Reply::NoAnswer,
    })
}

/// Run A → B → C, stopping at the first failure
///
/// # Errors
///
/// Returns the first [`PipelineError`]; later steps are not attempted
pub async fn run_steps(
    services: &dyn FarmServices,
    soil: &SoilParameters,
    text: &str,
) -> Result<Reply, PipelineError> {
    let context = submit_context(services, soil).await?;
    let prompt = transform_query(services, &context, text).await?;
    generate_answer(services, prompt).await
}

/// Run the chain and collapse any failure into [`Reply::Failed`]
pub async fn run(services: &dyn FarmServices, soil: &SoilParameters, text: &str) -> Reply {
    match run_steps(services, soil, text).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(step = %e.step, "Chat submission failed: {}", e);
            Reply::Failed
        }
    }
}
