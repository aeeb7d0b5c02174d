use crate::{count_words, split_sentences};

/// Rule line opening and closing every recap block.
pub const RECAP_RULE: &str = "───────────────────────────────────────";
/// Label line that marks a recap block.
pub const RECAP_LABEL: &str = "*Previously:*";

/// Builds the "Previously:" block that opens every segment after the first.
///
/// The recap repeats the closing sentences of the previous segment's own
/// text, so it must be given text that does not already start with a recap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecapBuilder {
    target_words: usize,
    max_sentences: usize,
}

impl Default for RecapBuilder {
    fn default() -> Self {
        Self {
            target_words: 250,
            max_sentences: 10,
        }
    }
}

impl RecapBuilder {
    pub fn new(target_words: usize, max_sentences: usize) -> Self {
        Self {
            target_words,
            max_sentences: max_sentences.max(1),
        }
    }

    /// The trailing sentences of `previous`, in original order, joined by
    /// single spaces. At least one sentence is kept even if it alone
    /// exceeds the word budget.
    pub fn recap_text(&self, previous: &str) -> String {
        let sentences = split_sentences(previous);
        let mut kept: Vec<&str> = Vec::new();
        let mut words = 0;

        for sentence in sentences.iter().rev() {
            let sentence_words = count_words(sentence);
            if words + sentence_words > self.target_words && !kept.is_empty() {
                break;
            }
            kept.push(sentence);
            words += sentence_words;
            if kept.len() >= self.max_sentences {
                break;
            }
        }

        kept.reverse();
        kept.iter()
            .flat_map(|s| s.split_whitespace())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The full delimited recap block.
    pub fn make_recap(&self, previous: &str) -> String {
        format!(
            "{RECAP_RULE}\n{RECAP_LABEL}\n> {}\n{RECAP_RULE}",
            self.recap_text(previous)
        )
    }

    /// `body` with a recap of `previous` prepended, separated by a blank line.
    pub fn prepend(&self, previous: &str, body: &str) -> String {
        format!("{}\n\n{body}", self.make_recap(previous))
    }
}

/// Returns `text` without a leading recap block. Text that does not open
/// with a recap is returned unchanged.
pub fn strip_recap(text: &str) -> &str {
    let Some(rest) = text
        .strip_prefix(RECAP_RULE)
        .and_then(|r| r.strip_prefix('\n'))
        .and_then(|r| r.strip_prefix(RECAP_LABEL))
        .and_then(|r| r.strip_prefix('\n'))
    else {
        return text;
    };
    match rest.find(&format!("\n{RECAP_RULE}")) {
        Some(end) => rest[end + 1 + RECAP_RULE.len()..].trim_start(),
        None => text,
    }
}
