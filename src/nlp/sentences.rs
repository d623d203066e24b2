//! Coarse sentence segmentation ahead of the external parser.

use once_cell::sync::Lazy;
use regex::Regex;

static BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").expect("valid regex"));

/// Split text after `.`, `!` or `?` followed by whitespace.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut from = 0;
    for boundary in BOUNDARY.find_iter(text) {
        let cut = boundary.start() + 1;
        sentences.push(&text[from..cut]);
        from = boundary.end();
    }
    sentences.push(&text[from..]);
    sentences
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
