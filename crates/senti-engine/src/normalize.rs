//! Input cleanup applied before any model sees the text.

use std::sync::LazyLock;

use regex::Regex;

/// Opening, closing or self-closing tags only; a bare `<` or `>` in prose is kept.
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</?[A-Za-z][A-Za-z0-9-]*(?:\s[^<>]*)?/?>").expect("static regex is valid")
});

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:https?://|www\.)\S+").expect("static regex is valid")
});

/// Normalize raw user text.
///
/// Strips HTML tags and URLs, turns control characters into spaces, collapses
/// whitespace runs to a single space and trims the ends. Casing is kept.
/// Deterministic and side-effect free.
#[must_use]
pub fn normalize_text(raw: &str) -> String {
    let without_tags = HTML_TAG.replace_all(raw, " ");
    let without_urls = URL.replace_all(&without_tags, " ");
    collapse_whitespace(&without_urls)
}

/// Replace control characters with spaces, collapse whitespace runs and trim.
#[must_use]
pub fn collapse_whitespace(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
