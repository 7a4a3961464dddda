use regex::Regex;
use std::sync::LazyLock;

/// Sentences kept by the fallback summary
pub const MAX_SENTENCES: usize = 2;

#[allow(clippy::expect_used)]
static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<!--\s*TTS-SUMMARY:\s*(.+?)\s*-->").expect("valid marker regex")
});
#[allow(clippy::expect_used)]
static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));
#[allow(clippy::expect_used)]
static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("valid fence regex"));
#[allow(clippy::expect_used)]
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`[^`]+`").expect("valid inline code regex"));
#[allow(clippy::expect_used)]
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("valid sentence regex"));

/// Pick what to say for a message: the explicit marker if present,
/// otherwise the first sentences of the prose.
pub fn summarize(text: &str) -> Option<String> {
    extract_marker(text).or_else(|| extract_fallback(text, MAX_SENTENCES))
}

/// Payload of a `<!-- TTS-SUMMARY: ... -->` comment, trimmed.
pub fn extract_marker(text: &str) -> Option<String> {
    let payload = MARKER.captures(text)?.get(1)?.as_str().trim();
    if payload.is_empty() {
        None
    } else {
        Some(payload.to_string())
    }
}

/// First `max_sentences` sentences of the text once comments and code are removed.
///
/// Sentences end at `.`, `!` or `?` followed by whitespace, so abbreviations
/// like "Dr. Smith" split early.
pub fn extract_fallback(text: &str, max_sentences: usize) -> Option<String> {
    let text = COMMENT.replace_all(text, "");
    let text = CODE_FENCE.replace_all(&text, "");
    let text = INLINE_CODE.replace_all(&text, "");

    let sentences: Vec<&str> = split_sentences(text.trim())
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(max_sentences)
        .collect();

    if sentences.is_empty() {
        None
    } else {
        Some(sentences.join(" "))
    }
}

fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for end in SENTENCE_END.find_iter(text) {
        // Keep the punctuation, drop the whitespace
        sentences.push(&text[start..end.start() + 1]);
        start = end.end();
    }
    sentences.push(&text[start..]);

    sentences
}
