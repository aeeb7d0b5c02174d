use serialcut_splitters::{count_words, strip_recap, RecapBuilder, RECAP_LABEL, RECAP_RULE};

fn sentences(count: usize, words_each: usize) -> String {
    (0..count)
        .map(|s| {
            let words: Vec<String> = (0..words_each).map(|w| format!("s{s}w{w}")).collect();
            format!("{}.", words.join(" "))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn recap_takes_trailing_sentences_in_order() {
    let text = "First thing happened. Then a second. Finally the third.";
    let recap = RecapBuilder::new(250, 2).recap_text(text);
    assert_eq!(recap, "Then a second. Finally the third.");
}

#[test]
fn recap_respects_word_budget() {
    let text = sentences(30, 20);
    let recap = RecapBuilder::new(100, 10).recap_text(&text);
    assert_eq!(count_words(&recap), 100);
    assert!(recap.ends_with("s29w19."));
    assert!(recap.starts_with("s25w0"));
}

#[test]
fn recap_respects_sentence_cap() {
    let text = sentences(30, 3);
    let recap = RecapBuilder::default().recap_text(&text);
    assert_eq!(count_words(&recap), 30);
    assert!(recap.starts_with("s20w0"));
}

#[test]
fn recap_keeps_one_long_sentence() {
    let text = sentences(1, 400);
    let recap = RecapBuilder::new(250, 10).recap_text(&text);
    assert_eq!(count_words(&recap), 400);
}

#[test]
fn recap_collapses_internal_whitespace() {
    let recap = RecapBuilder::default().recap_text("A line\nthat wraps.\n\nNext   one.");
    assert_eq!(recap, "A line that wraps. Next one.");
}

#[test]
fn recap_block_is_delimited() {
    let block = RecapBuilder::default().make_recap("He left. She stayed.");
    assert!(block.starts_with(RECAP_RULE));
    assert!(block.ends_with(RECAP_RULE));
    assert_eq!(block.matches(RECAP_LABEL).count(), 1);
    assert!(block.contains("\n> He left. She stayed.\n"));
}

#[test]
fn strip_recap_recovers_body() {
    let builder = RecapBuilder::default();
    let with_recap = builder.prepend("Old news. Older news.", "New chapter begins.\n\nMore.");
    assert_eq!(strip_recap(&with_recap), "New chapter begins.\n\nMore.");
}

#[test]
fn strip_recap_leaves_plain_text_alone() {
    assert_eq!(strip_recap("Just a story."), "Just a story.");
    assert_eq!(strip_recap(""), "");
}
