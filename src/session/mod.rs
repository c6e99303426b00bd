//! Chat session: transcript, soil form state and the submission chain
//!
//! - `conversation`: append-only transcript of `system`/`user`/`ai` messages
//! - `pipeline`: the context → prompt → answer request chain
//! - `chat_session`: the owned session state and its operations

pub mod chat_session;
pub mod conversation;
pub mod pipeline;

pub use chat_session::{ChatSession, CompletedSubmission, PendingSubmission};
pub use conversation::{Conversation, Message, Role};
pub use pipeline::{PipelineError, PipelineStep, Reply, CONNECTION_ERROR_MESSAGE, NO_ANSWER_MESSAGE};
