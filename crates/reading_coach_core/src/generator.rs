//! crates/reading_coach_core/src/generator.rs
//!
//! The reading generator: orchestrates prompt construction, the generation
//! client, fingerprinting, and the content store to produce one novel,
//! non-duplicate reading passage within a bounded attempt budget.

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::GenerationOutcome;
use crate::fingerprint::fingerprint;
use crate::options::GenerationOptions;
use crate::ports::{ContentStore, GenerationClient, PortResult};
use crate::prompt::reading_prompt;

/// Produces daily reading passages, retrying on empty or duplicate results.
#[derive(Clone)]
pub struct ReadingGenerator {
    store: Arc<dyn ContentStore>,
    client: Arc<dyn GenerationClient>,
    options: GenerationOptions,
}

impl ReadingGenerator {
    pub fn new(
        store: Arc<dyn ContentStore>,
        client: Arc<dyn GenerationClient>,
        options: GenerationOptions,
    ) -> Self {
        Self {
            store,
            client,
            options,
        }
    }

    /// Runs one generation cycle.
    ///
    /// Each attempt calls the client with the current step's prompt. A client
    /// failure or empty result consumes an attempt; so does a passage whose
    /// fingerprint is already recorded. The first novel, non-empty passage is
    /// fingerprinted, persisted as the next learning-state row, and returned.
    /// Exhausting the budget yields `GenerationOutcome::Exhausted`, a normal
    /// outcome, not an error. Storage failures propagate.
    pub async fn generate_daily_reading(&self) -> PortResult<GenerationOutcome> {
        let (topic, step) = self.store.current_state().await?;
        let prompt = reading_prompt(step);

        for attempt in 1..=self.options.max_attempts {
            let result = match self.client.generate(&prompt).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(attempt, "generation client failed: {}", e);
                    continue;
                }
            };
            if result.trim().is_empty() {
                warn!(attempt, "generation client returned empty text");
                continue;
            }

            let hash = fingerprint(&result);
            if self.store.has_fingerprint(&hash).await? {
                info!(attempt, "duplicate passage, requesting another");
                continue;
            }

            self.store.record_fingerprint(&hash).await?;
            self.store.save_state(&topic, step + 1, &result).await?;
            info!(attempt, step = step + 1, "new reading passage recorded");
            return Ok(GenerationOutcome::Generated(result));
        }

        warn!(
            attempts = self.options.max_attempts,
            "attempt budget exhausted without novel content"
        );
        Ok(GenerationOutcome::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChatTurn, MessageType, DEFAULT_TOPIC};
    use crate::ports::PortError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// In-memory store stub tracking fingerprints and state rows.
    #[derive(Default)]
    struct StubStore {
        fingerprints: Mutex<Vec<String>>,
        states: Mutex<Vec<(String, i64, String)>>,
    }

    #[async_trait]
    impl ContentStore for StubStore {
        async fn current_state(&self) -> PortResult<(String, i64)> {
            let states = self.states.lock().unwrap();
            Ok(states
                .last()
                .map(|(topic, step, _)| (topic.clone(), *step))
                .unwrap_or_else(|| (DEFAULT_TOPIC.to_string(), 0)))
        }

        async fn save_state(&self, topic: &str, step: i64, content: &str) -> PortResult<()> {
            self.states
                .lock()
                .unwrap()
                .push((topic.to_string(), step, content.to_string()));
            Ok(())
        }

        async fn has_fingerprint(&self, hash: &str) -> PortResult<bool> {
            Ok(self
                .fingerprints
                .lock()
                .unwrap()
                .iter()
                .any(|h| h == hash))
        }

        async fn record_fingerprint(&self, hash: &str) -> PortResult<()> {
            let mut fingerprints = self.fingerprints.lock().unwrap();
            if !fingerprints.iter().any(|h| h == hash) {
                fingerprints.push(hash.to_string());
            }
            Ok(())
        }

        async fn append_chat_turn(
            &self,
            _session_id: &str,
            _user_message: &str,
            _ai_response: &str,
            _message_type: MessageType,
        ) -> PortResult<()> {
            Ok(())
        }

        async fn recent_chat_turns(
            &self,
            _session_id: &str,
            _limit: i64,
        ) -> PortResult<Vec<ChatTurn>> {
            Ok(Vec::new())
        }

        async fn latest_task_content(&self, _session_id: &str) -> PortResult<Option<String>> {
            Ok(None)
        }

        async fn clear_session(&self, _session_id: &str) -> PortResult<()> {
            Ok(())
        }

        async fn prune_older_than(&self, _days: i64) -> PortResult<()> {
            Ok(())
        }
    }

    /// Client stub replaying a scripted sequence of responses.
    struct StubClient {
        responses: Mutex<Vec<PortResult<String>>>,
        calls: Mutex<u32>,
    }

    impl StubClient {
        fn new(responses: Vec<PortResult<String>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl GenerationClient for StubClient {
        async fn generate(&self, _prompt: &str) -> PortResult<String> {
            *self.calls.lock().unwrap() += 1;
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                responses.push(Ok(String::new()));
            }
            responses.remove(0)
        }
    }

    fn generator(
        store: Arc<StubStore>,
        client: Arc<StubClient>,
    ) -> ReadingGenerator {
        ReadingGenerator::new(store, client, GenerationOptions::default())
    }

    #[tokio::test]
    async fn first_run_succeeds_second_run_exhausts_on_repeats() {
        let store = Arc::new(StubStore::default());
        let fixed = "A fixed passage about monetary policy.".to_string();

        let client = Arc::new(StubClient::new(
            (0..5).map(|_| Ok(fixed.clone())).collect(),
        ));
        let outcome = generator(store.clone(), client.clone())
            .generate_daily_reading()
            .await
            .unwrap();

        assert_eq!(outcome, GenerationOutcome::Generated(fixed.clone()));
        assert_eq!(client.calls(), 1);
        assert_eq!(store.fingerprints.lock().unwrap().len(), 1);
        assert_eq!(store.states.lock().unwrap().len(), 1);
        assert_eq!(store.states.lock().unwrap()[0].1, 1);

        // Same stub text on every attempt: all five re-hash to the recorded
        // fingerprint and the run exhausts its budget.
        let client = Arc::new(StubClient::new(
            (0..5).map(|_| Ok(fixed.clone())).collect(),
        ));
        let outcome = generator(store.clone(), client.clone())
            .generate_daily_reading()
            .await
            .unwrap();

        assert_eq!(outcome, GenerationOutcome::Exhausted);
        assert_eq!(client.calls(), 5);
        assert_eq!(store.fingerprints.lock().unwrap().len(), 1);
        assert_eq!(store.states.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn succeeds_on_fifth_attempt_after_failures() {
        let store = Arc::new(StubStore::default());
        let client = Arc::new(StubClient::new(vec![
            Err(PortError::Unexpected("timeout".to_string())),
            Ok(String::new()),
            Err(PortError::Unexpected("503".to_string())),
            Ok("   ".to_string()),
            Ok("A unique essay on scientific method.".to_string()),
        ]));

        let outcome = generator(store.clone(), client.clone())
            .generate_daily_reading()
            .await
            .unwrap();

        assert_eq!(
            outcome,
            GenerationOutcome::Generated("A unique essay on scientific method.".to_string())
        );
        assert_eq!(client.calls(), 5);
    }

    #[tokio::test]
    async fn step_advances_across_runs() {
        let store = Arc::new(StubStore::default());

        let client = Arc::new(StubClient::new(vec![Ok("passage one".to_string())]));
        generator(store.clone(), client)
            .generate_daily_reading()
            .await
            .unwrap();
        let client = Arc::new(StubClient::new(vec![Ok("passage two".to_string())]));
        generator(store.clone(), client)
            .generate_daily_reading()
            .await
            .unwrap();

        let states = store.states.lock().unwrap();
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].1, 1);
        assert_eq!(states[1].1, 2);
        assert_eq!(states[1].0, DEFAULT_TOPIC);
    }
}
