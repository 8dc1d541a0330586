//! crates/reading_coach_core/src/prompt.rs
//!
//! Prompt construction for the two generation paths: the fixed-structure
//! daily-reading instruction and the context-augmented free-form chat prompt.

use crate::domain::ChatTurn;
use crate::options::GenerationOptions;
use crate::text::truncate_chars;

/// Builds the instruction for one daily reading passage.
///
/// The step number is embedded as a human-readable ordinal purely for the
/// model's awareness; it does not constrain the content.
pub fn reading_prompt(step: i64) -> String {
    format!(
        r#"Your task:
Generate ONE high-quality English reading passage suitable for CET-6 or early postgraduate level learners.

Requirements:
1. Topic must be ONE of the following:
   - Finance & Economics
   - Academic Research
   - Science & Technology
   - Famous Speeches or Intellectual Essays
2. Word count: 600-900 words
3. Style: formal, logical, academic or speech-like
4. Vocabulary: rich but appropriate for advanced learners
5. Content must be ORIGINAL and not repeated

After the reading passage, provide:
- 5 to 8 English comprehension questions
- Questions should include:
  - main idea
  - inference
  - vocabulary in context
  - author's attitude
- DO NOT provide answers

Output format strictly as:

Title
---
Reading Passage
---
Questions

This is reading number {}.
"#,
        step + 1
    )
}

/// Builds a context-augmented prompt for a free-form chat turn.
///
/// History is bounded regardless of session length: only the first
/// `task_excerpt_chars` of the latest task content and the last
/// `context_turns` turns (AI replies truncated to `reply_excerpt_chars`)
/// are surfaced. With no stored context, falls back to a bare framing.
pub fn chat_prompt(
    latest_task: Option<&str>,
    history: &[ChatTurn],
    current_message: &str,
    options: &GenerationOptions,
) -> String {
    let mut context_parts: Vec<String> = Vec::new();

    if let Some(task) = latest_task {
        context_parts.push(format!(
            "Most recently generated reading material:\n{}...",
            truncate_chars(task, options.task_excerpt_chars)
        ));
    }

    if !history.is_empty() {
        context_parts.push("Recent conversation:".to_string());
        let skip = history.len().saturating_sub(options.context_turns);
        for turn in &history[skip..] {
            context_parts.push(format!("User: {}", turn.user_message));
            context_parts.push(format!(
                "AI: {}...",
                truncate_chars(&turn.ai_response, options.reply_excerpt_chars)
            ));
        }
    }

    if context_parts.is_empty() {
        format!(
            "You are an English learning assistant. The user's question is: {}",
            current_message
        )
    } else {
        format!(
            "You are an English learning assistant. Here is the context of our earlier conversation:\n\n{}\n\nThe user's new question is: {}\n\nAnswer based on the context. If the user asks about the previously generated passage, refer to the reading material above.",
            context_parts.join("\n"),
            current_message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageType;
    use chrono::Utc;

    fn turn(user: &str, ai: &str) -> ChatTurn {
        ChatTurn {
            id: 0,
            session_id: "s".to_string(),
            user_message: user.to_string(),
            ai_response: ai.to_string(),
            message_type: MessageType::Chat,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn reading_prompt_embeds_ordinal_and_structure() {
        let prompt = reading_prompt(3);
        assert!(prompt.contains("This is reading number 4."));
        assert!(prompt.contains("Title\n---\nReading Passage\n---\nQuestions"));
        assert!(prompt.contains("Finance & Economics"));
        assert!(prompt.contains("DO NOT provide answers"));
    }

    #[test]
    fn chat_prompt_without_context_uses_bare_framing() {
        let prompt = chat_prompt(None, &[], "What does tariff mean?", &GenerationOptions::default());
        assert!(prompt.starts_with("You are an English learning assistant."));
        assert!(prompt.contains("What does tariff mean?"));
        assert!(!prompt.contains("Recent conversation"));
    }

    #[test]
    fn chat_prompt_truncates_task_excerpt_and_surfaces_last_turns() {
        let options = GenerationOptions {
            task_excerpt_chars: 10,
            reply_excerpt_chars: 5,
            context_turns: 3,
            ..GenerationOptions::default()
        };
        let history = vec![
            turn("q1", "a1-long-answer"),
            turn("q2", "a2-long-answer"),
            turn("q3", "a3-long-answer"),
            turn("q4", "a4-long-answer"),
        ];
        let task_text = "0123456789ABCDEF";
        let prompt = chat_prompt(Some(task_text), &history, "next?", &options);

        assert!(prompt.contains("0123456789..."));
        assert!(!prompt.contains("ABCDEF"));
        // Only the last three turns are surfaced.
        assert!(!prompt.contains("User: q1"));
        assert!(prompt.contains("User: q2"));
        assert!(prompt.contains("User: q4"));
        // Replies are truncated to five chars.
        assert!(prompt.contains("AI: a4-lo..."));
    }
}
