//! crates/reading_coach_core/src/fingerprint.rs
//!
//! Content fingerprinting for exact-duplicate detection.

use sha2::{Digest, Sha256};

/// Computes the deterministic fingerprint of a text blob: the SHA-256 digest
/// of its UTF-8 bytes, as lowercase hex. Pure, no failure modes.
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}
