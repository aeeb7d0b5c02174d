use std::sync::LazyLock;

use regex::Regex;

/// A run of terminal punctuation followed by whitespace.
static TERMINATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+\s+").expect("valid sentence terminator regex"));

/// Splits a paragraph into trimmed sentences.
///
/// Each punctuation run stays with the sentence it ends. A trailing fragment
/// without terminal punctuation is kept as the last sentence.
pub fn split_sentences(paragraph: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in TERMINATOR.find_iter(paragraph) {
        let sentence = paragraph[start..m.end()].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        start = m.end();
    }
    let tail = paragraph[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}
