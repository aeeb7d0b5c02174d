use std::sync::LazyLock;

use regex::Regex;
use serialcut_core::Segment;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("valid word regex"));

/// Counts maximal runs of word characters (Unicode alphanumerics and `_`).
/// Punctuation and whitespace only separate words.
pub fn count_words(text: &str) -> usize {
    WORD.find_iter(text).count()
}

/// Wraps `text` as a [`Segment`] carrying its own word count.
pub fn measure(text: impl Into<String>) -> Segment {
    let text = text.into();
    let word_count = count_words(&text);
    Segment::new(text, word_count)
}
