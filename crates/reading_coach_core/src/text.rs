//! crates/reading_coach_core/src/text.rs
//!
//! Small text utilities shared by the generator, orchestrator, and exporters.

/// Strips markdown emphasis markers (`#` and `*`) from generated text,
/// preserving all other characters and line breaks. Lines that began with a
/// marker (headings, bullets) also lose the whitespace the marker left
/// behind. Applied before export and before persisting chat responses.
pub fn clean_markdown(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            let led_with_marker = line.starts_with('#') || line.starts_with('*');
            let stripped: String = line.chars().filter(|c| *c != '#' && *c != '*').collect();
            if led_with_marker {
                stripped.trim_start().to_string()
            } else {
                stripped
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Returns at most the first `limit` characters of `text`.
///
/// Operates on chars rather than bytes so truncation never lands inside a
/// multi-byte sequence.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
