use serialcut_splitters::{
    count_words, measure, paragraph_boundaries, paragraph_units, split_paragraphs,
    split_sentences,
};

// --- count_words ---

#[test]
fn counts_word_runs_ignoring_punctuation() {
    assert_eq!(count_words("Hello, world! It's a snake_case test."), 7);
    assert_eq!(count_words("  \n\t "), 0);
    assert_eq!(count_words(""), 0);
    assert_eq!(count_words("* * *"), 0);
}

#[test]
fn counts_unicode_words() {
    assert_eq!(count_words("café naïve résumé"), 3);
    assert_eq!(count_words("—dash—separated—"), 2);
}

#[test]
fn measure_carries_word_count() {
    let segment = measure("one two three");
    assert_eq!(segment.word_count, 3);
    assert_eq!(segment.text, "one two three");
}

// --- paragraphs ---

#[test]
fn splits_on_blank_lines_and_drops_empties() {
    let doc = "First para.\nstill first.\n\n\n  \nSecond para.\n \t\nThird.\n\n";
    let paras = split_paragraphs(doc);
    assert_eq!(paras, vec!["First para.\nstill first.", "Second para.", "Third."]);
}

#[test]
fn paragraph_units_are_numbered_with_offsets() {
    let doc = "Alpha one.\n\n   Beta two.\n\n\n\nGamma three.";
    let units = paragraph_units(doc);
    assert_eq!(units.len(), 3);
    for (i, unit) in units.iter().enumerate() {
        assert_eq!(unit.number, i + 1);
        assert!(doc[unit.offset..].starts_with(unit.text));
    }
    assert_eq!(units[0].offset, 0);
    assert_eq!(units[1].text, "Beta two.");
}

#[test]
fn paragraph_boundaries_span_document() {
    let doc = "One.\n\nTwo.\n\nThree.";
    let boundaries = paragraph_boundaries(doc);
    assert_eq!(boundaries, vec![0, 6, 12, doc.len()]);
    assert_eq!(&doc[6..10], "Two.");

    assert_eq!(paragraph_boundaries(""), vec![0]);
}

#[test]
fn no_paragraphs_in_whitespace() {
    assert!(split_paragraphs("   \n\n  \n").is_empty());
}

// --- sentences ---

#[test]
fn sentences_keep_their_punctuation() {
    let sentences = split_sentences("Run! Where to?! Home... then sleep. trailing bit");
    assert_eq!(
        sentences,
        vec!["Run!", "Where to?!", "Home...", "then sleep.", "trailing bit"]
    );
}

#[test]
fn sentence_without_terminator_is_kept() {
    assert_eq!(split_sentences("no ending here"), vec!["no ending here"]);
    assert!(split_sentences("   ").is_empty());
}

#[test]
fn punctuation_without_whitespace_does_not_split() {
    assert_eq!(split_sentences("v1.2 is out. Yes."), vec!["v1.2 is out.", "Yes."]);
}
