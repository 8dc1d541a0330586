//! crates/reading_coach_core/src/options.rs
//!
//! Tunables for the generator and the chat orchestrator. The defaults mirror
//! the behavior of the reference deployment; none of them is derived from an
//! SLA, so they are all overridable at construction time.

/// Knobs shared by the reading generator and the session chat orchestrator.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Total attempt budget per generation run, covering both empty/failed
    /// results and duplicate results. Bounds retries against a paid API.
    pub max_attempts: u32,
    /// How many chat turns to fetch from storage when building context.
    pub history_limit: i64,
    /// How many of the fetched turns actually make it into the prompt.
    pub context_turns: usize,
    /// Characters of the latest task content surfaced as prior reading material.
    pub task_excerpt_chars: usize,
    /// Characters of each prior AI reply surfaced in the prompt.
    pub reply_excerpt_chars: usize,
    /// Characters of a freshly generated passage shown in previews.
    pub preview_chars: usize,
    /// Age threshold for the chat-history retention sweep.
    pub retention_days: i64,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            history_limit: 5,
            context_turns: 3,
            task_excerpt_chars: 500,
            reply_excerpt_chars: 200,
            preview_chars: 600,
            retention_days: 7,
        }
    }
}
