use serde::Serialize;

pub const TRUNCATION_MARKER: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedText {
    pub text: String,
    pub truncated: bool,
}

/// Caps `text` at `max_words` whitespace-delimited words.
///
/// Text within the ceiling is returned untouched, whitespace included. Longer
/// text keeps its first `max_words` words joined by single spaces, followed by
/// [`TRUNCATION_MARKER`]. Words are whitespace runs, not model tokens.
pub fn bound(text: &str, max_words: usize) -> GeneratedText {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return GeneratedText {
            text: text.to_string(),
            truncated: false,
        };
    }

    let mut kept = words[..max_words].join(" ");
    kept.push_str(TRUNCATION_MARKER);
    GeneratedText {
        text: kept,
        truncated: true,
    }
}
