//! crates/reading_coach_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};

/// The topic label used until a first learning-state row exists.
pub const DEFAULT_TOPIC: &str = "English Reading";

/// One row of generation progress: a passage was produced at a given step.
/// Rows are append-only; the most recently inserted row is the current state.
#[derive(Debug, Clone)]
pub struct LearningState {
    pub id: i64,
    pub topic: String,
    pub step: i64,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Distinguishes reading-generation turns from free-form Q&A turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Chat,
    Task,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Chat => "chat",
            MessageType::Task => "task",
        }
    }

    /// Parses the stored label, defaulting unknown values to `Chat`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "task" => MessageType::Task,
            _ => MessageType::Chat,
        }
    }
}

/// A single request/response exchange within a web-style session.
/// Turns are immutable once written; ordering is by insertion.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub id: i64,
    pub session_id: String,
    pub user_message: String,
    pub ai_response: String,
    pub message_type: MessageType,
    pub timestamp: DateTime<Utc>,
}

/// Terminal outcome of one reading-generation run.
///
/// `Exhausted` is a defined result, not an error: the attempt budget ran out
/// without a novel, non-empty passage, and the caller should suggest retrying
/// later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Generated(String),
    Exhausted,
}
