//! Chat session state and the submit operation
//!
//! A [`ChatSession`] owns the transcript, the soil form, the pending input
//! text and the busy flag. Submitting is split in three phases so a caller
//! can keep the session available (for rendering, parameter edits, or a
//! rejected second submit) while the network chain is in flight:
//!
//! 1. [`ChatSession::begin_submit`] checks the guards, appends the `user`
//!    message, clears the input and marks the session busy.
//! 2. [`PendingSubmission::run`] performs the three service calls. It owns
//!    everything it needs and borrows nothing from the session.
//! 3. [`ChatSession::finish_submit`] appends the `ai` reply and clears the
//!    busy flag.
//!
//! [`ChatSession::submit`] runs all three back to back.

use crate::config::SessionConfig;
use crate::error::AgronusError;
use crate::services::FarmServices;
use crate::session::conversation::{Conversation, Message};
use crate::session::pipeline::{self, Reply};
use crate::soil::{SoilField, SoilParameters};
use std::sync::Arc;

/// State of one interactive chat session
pub struct ChatSession {
    services: Arc<dyn FarmServices>,
    conversation: Conversation,
    soil: SoilParameters,
    input: String,
    busy: bool,
    reset_greeting: String,
    sample_questions: Vec<String>,
}

/// A submission whose user message is already in the transcript
///
/// Holds a copy of the soil parameters taken when the submission began;
/// later edits to the session do not affect it.
pub struct PendingSubmission {
    services: Arc<dyn FarmServices>,
    text: String,
    soil: SoilParameters,
}

/// Result of [`PendingSubmission::run`], ready to hand back to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedSubmission {
    reply: Reply,
}

impl CompletedSubmission {
    /// The reply that will be appended
    pub fn reply(&self) -> &Reply {
        &self.reply
    }
}

impl PendingSubmission {
    /// Text that was submitted
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Soil snapshot that will be sent
    pub fn soil(&self) -> &SoilParameters {
        &self.soil
    }

    /// Perform the context → prompt → answer chain
    ///
    /// Never fails: a failing step becomes [`Reply::Failed`].
    pub async fn run(self) -> CompletedSubmission {
        let reply = pipeline::run(self.services.as_ref(), &self.soil, &self.text).await;
        CompletedSubmission { reply }
    }
}

impl ChatSession {
    /// Start a session
    ///
    /// The transcript opens with the configured greeting as a `system`
    /// message.
    pub fn new(services: Arc<dyn FarmServices>, config: &SessionConfig) -> Self {
        tracing::debug!("Starting chat session");
        Self {
            services,
            conversation: Conversation::with_system(config.greeting.clone()),
            soil: config.soil,
            input: String::new(),
            busy: false,
            reset_greeting: config.reset_greeting.clone(),
            sample_questions: config.sample_questions.clone(),
        }
    }

    /// The transcript
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Current soil parameters
    pub fn soil(&self) -> &SoilParameters {
        &self.soil
    }

    /// Current input text
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the input text
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Whether a submission is in flight
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Canned questions offered to the user
    pub fn sample_questions(&self) -> &[String] {
        &self.sample_questions
    }

    /// Whether sample questions should be offered
    ///
    /// They are shown only at the start of a conversation and never while
    /// a submission is in flight.
    pub fn shows_samples(&self) -> bool {
        self.conversation.len() < 3 && !self.busy
    }

    /// Overwrite one soil parameter
    ///
    /// No range validation is applied. Allowed while busy; an in-flight
    /// submission keeps the snapshot it started with.
    ///
    /// # Errors
    ///
    /// Returns error for an unknown field name or a non-numeric value; the
    /// parameters are unchanged in that case
    pub fn update_parameter(&mut self, name: &str, value: &str) -> Result<SoilField, AgronusError> {
        let field = self.soil.update(name, value)?;
        tracing::debug!("Updated {} to {}", field, self.soil.get(field));
        Ok(field)
    }

    /// Copy a canned question into the input without submitting it
    pub fn select_sample(&mut self, question: impl Into<String>) {
        self.input = question.into();
    }

    /// Copy the sample question at `index` (zero-based) into the input
    ///
    /// Returns the selected question, or `None` if the index is out of range.
    pub fn select_sample_at(&mut self, index: usize) -> Option<&str> {
        let question = self.sample_questions.get(index)?.clone();
        self.select_sample(question);
        Some(&self.input)
    }

    /// Discard the transcript and start over with the reset greeting
    ///
    /// Soil parameters are kept. Returns `false` (and changes nothing) while
    /// a submission is in flight.
    pub fn new_session(&mut self) -> bool {
        if self.busy {
            tracing::debug!("Ignoring new session request while busy");
            return false;
        }
        self.conversation = Conversation::with_system(self.reset_greeting.clone());
        self.input.clear();
        tracing::info!("Started new chat session");
        true
    }

    /// First phase of a submission
    ///
    /// Returns `None` without touching any state when `text` is blank or a
    /// submission is already in flight. Otherwise appends the `user`
    /// message, clears the input, marks the session busy and returns the
    /// work still to be done.
    pub fn begin_submit(&mut self, text: &str) -> Option<PendingSubmission> {
        if text.trim().is_empty() {
            return None;
        }
        if self.busy {
            tracing::debug!("Ignoring submission while another is in flight");
            return None;
        }

        self.conversation.push(Message::user(text));
        self.input.clear();
        self.busy = true;
        tracing::info!("Submitting chat message");

        Some(PendingSubmission {
            services: Arc::clone(&self.services),
            text: text.to_string(),
            soil: self.soil,
        })
    }

    /// Last phase of a submission: append the reply and clear the busy flag
    pub fn finish_submit(&mut self, completed: CompletedSubmission) {
        self.conversation.push(completed.reply.to_message());
        self.busy = false;
        tracing::debug!("Submission finished: {:?}", completed.reply);
    }

    /// Submit `text` and wait for the reply
    ///
    /// Returns `false` if the submission was ignored (blank text or busy).
    pub async fn submit(&mut self, text: &str) -> bool {
        let Some(pending) = self.begin_submit(text) else {
            return false;
        };
        let completed = pending.run().await;
        self.finish_submit(completed);
        true
    }

    /// Submit the current input text
    pub async fn submit_input(&mut self) -> bool {
        let text = self.input.clone();
        self.submit(&text).await
    }
}
