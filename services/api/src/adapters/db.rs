//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `ContentStore` port from the `core` crate. It handles all interactions
//! with the SQLite database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reading_coach_core::domain::{ChatTurn, MessageType, DEFAULT_TOPIC};
use reading_coach_core::ports::{ContentStore, PortError, PortResult};
use sqlx::{FromRow, SqlitePool};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `ContentStore` port.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Creates a new `SqliteStore`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates the schema at startup. All three tables are append-mostly;
    /// the fingerprint column carries the uniqueness constraint that makes
    /// `record_fingerprint` idempotent.
    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS learning_state (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                topic TEXT NOT NULL,
                step INTEGER NOT NULL,
                content TEXT NOT NULL,
                timestamp TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sent_content (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content_hash TEXT NOT NULL UNIQUE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chat_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                user_message TEXT NOT NULL,
                ai_response TEXT NOT NULL,
                message_type TEXT NOT NULL DEFAULT 'chat',
                timestamp TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct StateRecord {
    topic: String,
    step: i64,
}

#[derive(FromRow)]
struct ChatTurnRecord {
    id: i64,
    session_id: String,
    user_message: String,
    ai_response: String,
    message_type: String,
    timestamp: DateTime<Utc>,
}

impl ChatTurnRecord {
    fn to_domain(self) -> ChatTurn {
        ChatTurn {
            id: self.id,
            session_id: self.session_id,
            user_message: self.user_message,
            ai_response: self.ai_response,
            message_type: MessageType::from_label(&self.message_type),
            timestamp: self.timestamp,
        }
    }
}

//=========================================================================================
// `ContentStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl ContentStore for SqliteStore {
    async fn current_state(&self) -> PortResult<(String, i64)> {
        let record = sqlx::query_as::<_, StateRecord>(
            "SELECT topic, step FROM learning_state ORDER BY id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(record
            .map(|r| (r.topic, r.step))
            .unwrap_or_else(|| (DEFAULT_TOPIC.to_string(), 0)))
    }

    async fn save_state(&self, topic: &str, step: i64, content: &str) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO learning_state (topic, step, content, timestamp) VALUES (?, ?, ?, ?)",
        )
        .bind(topic)
        .bind(step)
        .bind(content)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn has_fingerprint(&self, hash: &str) -> PortResult<bool> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM sent_content WHERE content_hash = ?")
                .bind(hash)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(found.is_some())
    }

    async fn record_fingerprint(&self, hash: &str) -> PortResult<()> {
        sqlx::query("INSERT OR IGNORE INTO sent_content (content_hash) VALUES (?)")
            .bind(hash)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn append_chat_turn(
        &self,
        session_id: &str,
        user_message: &str,
        ai_response: &str,
        message_type: MessageType,
    ) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO chat_history (session_id, user_message, ai_response, message_type, timestamp) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(session_id)
        .bind(user_message)
        .bind(ai_response)
        .bind(message_type.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn recent_chat_turns(&self, session_id: &str, limit: i64) -> PortResult<Vec<ChatTurn>> {
        let records = sqlx::query_as::<_, ChatTurnRecord>(
            "SELECT id, session_id, user_message, ai_response, message_type, timestamp FROM chat_history WHERE session_id = ? ORDER BY id DESC LIMIT ?",
        )
        .bind(session_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // The query walks backwards for the LIMIT; callers want oldest first.
        let turns = records.into_iter().rev().map(|r| r.to_domain()).collect();
        Ok(turns)
    }

    async fn latest_task_content(&self, session_id: &str) -> PortResult<Option<String>> {
        let content: Option<String> = sqlx::query_scalar(
            "SELECT ai_response FROM chat_history WHERE session_id = ? AND message_type = 'task' ORDER BY id DESC LIMIT 1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(content)
    }

    async fn clear_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM chat_history WHERE session_id = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn prune_older_than(&self, days: i64) -> PortResult<()> {
        let cutoff = Utc::now() - Duration::days(days);
        sqlx::query("DELETE FROM chat_history WHERE timestamp < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }
}

//=========================================================================================
// Tests (hermetic, in-memory SQLite)
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    /// One connection only: each `sqlite::memory:` connection is its own database.
    async fn store() -> SqliteStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        let store = SqliteStore::new(pool);
        store.init_schema().await.expect("schema");
        store
    }

    #[tokio::test]
    async fn empty_store_returns_default_state() {
        let store = store().await;
        let (topic, step) = store.current_state().await.unwrap();
        assert_eq!(topic, "English Reading");
        assert_eq!(step, 0);
    }

    #[tokio::test]
    async fn current_state_is_the_latest_row() {
        let store = store().await;
        store.save_state("Topic", 3, "X").await.unwrap();
        store.save_state("Topic", 4, "Y").await.unwrap();
        let (topic, step) = store.current_state().await.unwrap();
        assert_eq!(topic, "Topic");
        assert_eq!(step, 4);
    }

    #[tokio::test]
    async fn fingerprint_recording_is_idempotent() {
        let store = store().await;
        let hash = "ab".repeat(32);

        assert!(!store.has_fingerprint(&hash).await.unwrap());
        store.record_fingerprint(&hash).await.unwrap();
        assert!(store.has_fingerprint(&hash).await.unwrap());
        // Duplicate insert is a silent no-op.
        store.record_fingerprint(&hash).await.unwrap();
        assert!(store.has_fingerprint(&hash).await.unwrap());

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sent_content")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn fingerprint_lookup_is_exact_and_case_sensitive() {
        let store = store().await;
        store.record_fingerprint("abc123").await.unwrap();
        assert!(store.has_fingerprint("abc123").await.unwrap());
        assert!(!store.has_fingerprint("ABC123").await.unwrap());
        assert!(!store.has_fingerprint("abc12").await.unwrap());
    }

    #[tokio::test]
    async fn recent_turns_come_back_oldest_first_with_limit() {
        let store = store().await;
        for i in 1..=4 {
            store
                .append_chat_turn("s1", &format!("q{}", i), &format!("a{}", i), MessageType::Chat)
                .await
                .unwrap();
        }

        let turns = store.recent_chat_turns("s1", 3).await.unwrap();
        let questions: Vec<&str> = turns.iter().map(|t| t.user_message.as_str()).collect();
        assert_eq!(questions, vec!["q2", "q3", "q4"]);
    }

    #[tokio::test]
    async fn latest_task_content_ignores_chat_turns() {
        let store = store().await;
        assert_eq!(store.latest_task_content("s1").await.unwrap(), None);

        store
            .append_chat_turn("s1", "task", "first passage", MessageType::Task)
            .await
            .unwrap();
        store
            .append_chat_turn("s1", "hello", "hi there", MessageType::Chat)
            .await
            .unwrap();
        store
            .append_chat_turn("s1", "task", "second passage", MessageType::Task)
            .await
            .unwrap();

        assert_eq!(
            store.latest_task_content("s1").await.unwrap().as_deref(),
            Some("second passage")
        );
    }

    #[tokio::test]
    async fn clear_session_leaves_other_sessions_untouched() {
        let store = store().await;
        store
            .append_chat_turn("s1", "q", "a", MessageType::Chat)
            .await
            .unwrap();
        store
            .append_chat_turn("s2", "q", "a", MessageType::Chat)
            .await
            .unwrap();

        store.clear_session("s1").await.unwrap();

        assert!(store.recent_chat_turns("s1", 10).await.unwrap().is_empty());
        assert_eq!(store.recent_chat_turns("s2", 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn prune_removes_only_turns_past_the_threshold() {
        let store = store().await;

        // Insert directly so the timestamps can sit in the past.
        for (session, age_days) in [("old", 8), ("fresh", 6)] {
            sqlx::query(
                "INSERT INTO chat_history (session_id, user_message, ai_response, message_type, timestamp) VALUES (?, 'q', 'a', 'chat', ?)",
            )
            .bind(session)
            .bind(Utc::now() - Duration::days(age_days))
            .execute(&store.pool)
            .await
            .unwrap();
        }

        store.prune_older_than(7).await.unwrap();

        assert!(store.recent_chat_turns("old", 10).await.unwrap().is_empty());
        assert_eq!(store.recent_chat_turns("fresh", 10).await.unwrap().len(), 1);
    }
}
