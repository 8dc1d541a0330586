//! crates/reading_coach_core/src/chat.rs
//!
//! The session chat orchestrator: routes each turn either to the reading
//! generator (the literal "task" command) or to a single-shot, context-aware
//! chat completion, and keeps the per-session history log complete:
//! even failed turns leave a record.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use crate::domain::{GenerationOutcome, MessageType};
use crate::generator::ReadingGenerator;
use crate::options::GenerationOptions;
use crate::ports::{ContentStore, GenerationClient, PortResult, ReadingExporter};
use crate::prompt::chat_prompt;
use crate::text::{clean_markdown, truncate_chars};

/// The command token that triggers reading generation instead of free-form chat.
const TASK_COMMAND: &str = "task";

/// What a chat turn produced. `full_content` and `file_path` are only set for
/// successful task turns.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub response: String,
    pub full_content: Option<String>,
    pub file_path: Option<PathBuf>,
}

impl ChatReply {
    fn text(response: String) -> Self {
        Self {
            response,
            full_content: None,
            file_path: None,
        }
    }
}

/// Handles one conversational exchange per call; sessions are identified by
/// an opaque id minted at the boundary and threaded through explicitly.
#[derive(Clone)]
pub struct ChatOrchestrator {
    store: Arc<dyn ContentStore>,
    client: Arc<dyn GenerationClient>,
    exporter: Arc<dyn ReadingExporter>,
    generator: ReadingGenerator,
    options: GenerationOptions,
}

impl ChatOrchestrator {
    pub fn new(
        store: Arc<dyn ContentStore>,
        client: Arc<dyn GenerationClient>,
        exporter: Arc<dyn ReadingExporter>,
        options: GenerationOptions,
    ) -> Self {
        let generator = ReadingGenerator::new(store.clone(), client.clone(), options.clone());
        Self {
            store,
            client,
            exporter,
            generator,
            options,
        }
    }

    /// Handles one turn for the session.
    ///
    /// Client failures on either path are caught and turned into a
    /// user-visible error string that is persisted as the turn's AI response
    /// and returned, never raised. Storage failures propagate.
    pub async fn handle_turn(&self, session_id: &str, message: &str) -> PortResult<ChatReply> {
        if message.trim().eq_ignore_ascii_case(TASK_COMMAND) {
            self.handle_task_turn(session_id, message).await
        } else {
            self.handle_chat_turn(session_id, message).await
        }
    }

    async fn handle_task_turn(&self, session_id: &str, message: &str) -> PortResult<ChatReply> {
        // Client failures are absorbed into the generator's attempt budget;
        // an Err here is a storage failure and stays fatal.
        let outcome = self.generator.generate_daily_reading().await?;

        match outcome {
            GenerationOutcome::Generated(content) => {
                let cleaned = clean_markdown(&content);
                let path = self.exporter.export(&cleaned).await?;

                // The history row keeps the full passage; the reply carries a preview.
                self.store
                    .append_chat_turn(session_id, message, &cleaned, MessageType::Task)
                    .await?;

                let response = format!(
                    "Today's English reading is ready!\nSaved to: {}\n\n{}...",
                    path.display(),
                    truncate_chars(&cleaned, self.options.preview_chars)
                );
                info!(session_id, "task turn completed");
                Ok(ChatReply {
                    response,
                    full_content: Some(cleaned),
                    file_path: Some(path),
                })
            }
            GenerationOutcome::Exhausted => {
                let error_msg = "Failed to generate content. Please try again.".to_string();
                self.store
                    .append_chat_turn(session_id, message, &error_msg, MessageType::Task)
                    .await?;
                Ok(ChatReply::text(error_msg))
            }
        }
    }

    async fn handle_chat_turn(&self, session_id: &str, message: &str) -> PortResult<ChatReply> {
        let latest_task = self.store.latest_task_content(session_id).await?;
        let history = self
            .store
            .recent_chat_turns(session_id, self.options.history_limit)
            .await?;
        let prompt = chat_prompt(latest_task.as_deref(), &history, message, &self.options);

        // Single attempt, no dedup: free-form answers are expected to repeat.
        let response = match self.client.generate(&prompt).await {
            Ok(text) if !text.trim().is_empty() => clean_markdown(&text),
            Ok(_) => "Sorry, I couldn't generate a response.".to_string(),
            Err(e) => {
                error!("chat completion failed: {}", e);
                format!("Service error: {}", e)
            }
        };

        self.store
            .append_chat_turn(session_id, message, &response, MessageType::Chat)
            .await?;
        Ok(ChatReply::text(response))
    }
}
