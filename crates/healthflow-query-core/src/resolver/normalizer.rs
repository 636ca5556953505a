//! Query text normalization.
//!
//! Lower-cases, trims and collapses internal whitespace. Every matching
//! stage and the filter extractor operate on the normalized form.

/// Normalize raw user text. Empty or blank input yields an empty string.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split normalized text into whitespace-separated tokens.
pub fn tokenize(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split_whitespace()
}
