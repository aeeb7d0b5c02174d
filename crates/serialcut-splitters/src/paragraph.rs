use std::sync::LazyLock;

use regex::Regex;

/// One or more blank (whitespace-only) lines.
static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid paragraph separator regex"));

/// A paragraph of the original document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paragraph<'a> {
    /// 1-based position among non-empty paragraphs.
    pub number: usize,
    /// Byte offset of the first non-whitespace character.
    pub offset: usize,
    /// Whitespace-trimmed paragraph text.
    pub text: &'a str,
}

/// Paragraph units in document order, numbered from 1.
pub fn paragraph_units(document: &str) -> Vec<Paragraph<'_>> {
    let mut units = Vec::new();
    let mut start = 0;
    for m in SEPARATOR.find_iter(document) {
        push_unit(&mut units, document, start, m.start());
        start = m.end();
    }
    push_unit(&mut units, document, start, document.len());
    units
}

fn push_unit<'a>(units: &mut Vec<Paragraph<'a>>, document: &'a str, from: usize, to: usize) {
    let raw = &document[from..to];
    let text = raw.trim();
    if text.is_empty() {
        return;
    }
    units.push(Paragraph {
        number: units.len() + 1,
        offset: from + (raw.len() - raw.trim_start().len()),
        text,
    });
}

/// Non-empty, trimmed paragraphs split on blank lines.
pub fn split_paragraphs(document: &str) -> Vec<&str> {
    paragraph_units(document)
        .into_iter()
        .map(|p| p.text)
        .collect()
}

/// Offsets where a cut lands cleanly: 0, the end of every blank-line
/// separator, and the document length. Sorted, without duplicates.
pub fn paragraph_boundaries(document: &str) -> Vec<usize> {
    let mut boundaries = vec![0];
    boundaries.extend(SEPARATOR.find_iter(document).map(|m| m.end()));
    boundaries.push(document.len());
    boundaries.dedup();
    boundaries
}
