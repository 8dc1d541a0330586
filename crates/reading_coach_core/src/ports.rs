//! crates/reading_coach_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::{ChatTurn, MessageType};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable storage for learning progress, content fingerprints, and chat history.
///
/// Storage unavailability is fatal for the enclosing operation: losing writes
/// would corrupt the dedup and progress invariants, so failures propagate
/// instead of being swallowed.
#[async_trait]
pub trait ContentStore: Send + Sync {
    // --- Learning State ---

    /// Returns the most recent `(topic, step)`, or `("English Reading", 0)`
    /// when no state has been recorded yet. Absence is a normal case.
    async fn current_state(&self) -> PortResult<(String, i64)>;

    /// Appends a new learning-state row. No uniqueness constraint on (topic, step).
    async fn save_state(&self, topic: &str, step: i64, content: &str) -> PortResult<()>;

    // --- Content Fingerprints ---

    /// Exact membership test against the recorded fingerprint set.
    async fn has_fingerprint(&self, hash: &str) -> PortResult<bool>;

    /// Idempotent insert; inserting a fingerprint that already exists is a no-op.
    async fn record_fingerprint(&self, hash: &str) -> PortResult<()>;

    // --- Chat History ---

    async fn append_chat_turn(
        &self,
        session_id: &str,
        user_message: &str,
        ai_response: &str,
        message_type: MessageType,
    ) -> PortResult<()>;

    /// Up to `limit` most recent turns for the session, oldest first.
    async fn recent_chat_turns(&self, session_id: &str, limit: i64) -> PortResult<Vec<ChatTurn>>;

    /// The AI response of the most recent task-type turn for the session.
    async fn latest_task_content(&self, session_id: &str) -> PortResult<Option<String>>;

    /// Deletes all turns belonging to the session.
    async fn clear_session(&self, session_id: &str) -> PortResult<()>;

    /// Retention sweep: deletes all turns older than `days` days.
    async fn prune_older_than(&self, days: i64) -> PortResult<()>;
}

/// The external text-generation service. Any chat-completion API fulfills
/// this contract; implementers supply authentication, a request timeout, and
/// map non-2xx responses or malformed bodies to `Err`, never partial text.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> PortResult<String>;
}

/// Writes a finished reading passage to a durable, human-retrievable location.
/// Callers strip markdown markers before exporting.
#[async_trait]
pub trait ReadingExporter: Send + Sync {
    async fn export(&self, text: &str) -> PortResult<PathBuf>;
}

/// Fire-and-forget user notification. Best effort; failures are not propagated.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str);
}
