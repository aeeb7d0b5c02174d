use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serialcut::advisor::{BoundaryAdvisor, BoundaryCandidate};
use serialcut::anthropic::AnthropicConfig;
use serialcut::models::ScriptedChatModel;
use serialcut::splitters::{count_words, strip_recap, DeterministicSegmenter, RECAP_LABEL};
use serialcut::{
    chunk_key, ChunkManifest, Chunker, ChunkingConfig, Segmenter, SerialcutError, Strategy,
};

fn paragraph(words: usize, tag: usize) -> String {
    (0..words)
        .map(|i| format!("t{tag}w{i}"))
        .collect::<Vec<_>>()
        .chunks(12)
        .map(|s| format!("{}.", s.join(" ")))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Scene break `* * *` is paragraph 31 of 41; 4000 words in total.
fn story() -> String {
    let mut paras: Vec<String> = (0..30).map(|i| paragraph(100, i)).collect();
    paras.push("* * *".to_string());
    paras.extend((30..40).map(|i| paragraph(100, i)));
    paras.join("\n\n")
}

struct CountingAdvisor {
    calls: AtomicUsize,
    result: Vec<usize>,
}

#[async_trait]
impl BoundaryAdvisor for CountingAdvisor {
    async fn find_boundaries(
        &self,
        _document: &str,
        _target_words: usize,
    ) -> Result<Vec<BoundaryCandidate>, SerialcutError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.result.iter().copied().map(BoundaryCandidate::at).collect())
    }
}

fn chunker(target: usize) -> Chunker {
    Chunker::new(ChunkingConfig::new(target)).unwrap()
}

#[tokio::test]
async fn deterministic_without_advisor() {
    let doc = story();
    let outcome = chunker(1000).chunk(&doc, 1000).await;
    assert_eq!(outcome.strategy, Strategy::Deterministic);
    assert_eq!(
        outcome.segments,
        DeterministicSegmenter::new().segment(&doc, 1000, 0.1)
    );
}

#[tokio::test]
async fn advised_when_model_names_scene_break() {
    let doc = story();
    let model = Arc::new(ScriptedChatModel::replying(
        "BREAK_PARA: 31\nREASON: siege ends | aftermath",
    ));
    let outcome = chunker(5000).with_chat_model(model).chunk(&doc, 5000).await;

    assert_eq!(outcome.strategy, Strategy::Advised);
    assert_eq!(outcome.segments.len(), 2);
    assert_eq!(outcome.segments[0].word_count, 3000);
    assert!(strip_recap(&outcome.segments[1].text).starts_with("* * *"));
    assert_eq!(outcome.segments[1].text.matches(RECAP_LABEL).count(), 1);
}

#[tokio::test]
async fn model_failure_matches_deterministic_output() {
    let doc = story();
    let model = Arc::new(ScriptedChatModel::failing(SerialcutError::Model(
        "503 upstream".to_string(),
    )));
    let outcome = chunker(1000).with_chat_model(model).chunk(&doc, 1000).await;
    assert_eq!(outcome.strategy, Strategy::Deterministic);
    assert!(!outcome.segments.is_empty());
    assert_eq!(
        outcome.segments,
        DeterministicSegmenter::new().segment(&doc, 1000, 0.1)
    );
}

#[tokio::test]
async fn rejected_boundary_falls_back() {
    let doc = story();
    // Paragraph 40 would leave only 200 words.
    let model = Arc::new(ScriptedChatModel::replying("BREAK_PARA: 40"));
    let segments = chunker(1000).with_chat_model(model).chunk_story(&doc, 1000).await;
    assert_eq!(segments, DeterministicSegmenter::new().segment(&doc, 1000, 0.1));
}

#[tokio::test]
async fn min_trailing_words_comes_from_config() {
    let doc = story();
    let model = Arc::new(ScriptedChatModel::replying("BREAK_PARA: 40"));
    let config = ChunkingConfig::new(1000).with_min_trailing_words(100);
    let outcome = Chunker::new(config)
        .unwrap()
        .with_chat_model(model)
        .chunk(&doc, 1000)
        .await;
    assert_eq!(outcome.strategy, Strategy::Advised);
    assert_eq!(outcome.segments.len(), 2);
}

#[tokio::test]
async fn disabled_advisor_is_never_called() {
    let doc = story();
    let advisor = Arc::new(CountingAdvisor {
        calls: AtomicUsize::new(0),
        result: vec![doc.len() / 2],
    });
    let chunker = Chunker::new(ChunkingConfig::new(1000).with_advisor(false))
        .unwrap()
        .with_advisor(advisor.clone());
    assert!(matches!(chunker.segmenter(), Segmenter::Deterministic(_)));

    let outcome = chunker.chunk(&doc, 1000).await;
    assert_eq!(outcome.strategy, Strategy::Deterministic);
    assert_eq!(advisor.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_story_yields_single_empty_segment() {
    let advisor = Arc::new(CountingAdvisor {
        calls: AtomicUsize::new(0),
        result: vec![],
    });
    let chunker = chunker(1000).with_advisor(advisor.clone());
    for doc in ["", " \n\n\t "] {
        let segments = chunker.chunk_story(doc, 1000).await;
        assert_eq!(segments.len(), 1);
        assert!(segments[0].is_empty());
        assert_eq!(segments[0].word_count, 0);
    }
    assert_eq!(advisor.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn every_word_survives_in_order() {
    let doc = story();
    let advisor = Arc::new(CountingAdvisor {
        calls: AtomicUsize::new(0),
        result: vec![doc.len() / 3, 2 * doc.len() / 3],
    });
    let segments = chunker(1000).with_advisor(advisor).chunk_story(&doc, 1000).await;
    assert_eq!(segments.len(), 3);

    let rebuilt: String = segments
        .iter()
        .map(|s| strip_recap(&s.text))
        .collect::<Vec<_>>()
        .join("\n\n");
    let words = |t: &str| t.split_whitespace().map(str::to_string).collect::<Vec<_>>();
    assert_eq!(words(&rebuilt), words(&doc));
    for segment in &segments {
        assert_eq!(segment.word_count, count_words(&segment.text));
    }
}

#[tokio::test]
async fn zero_target_uses_configured_target() {
    let doc = "One two three. Four five six.\n\nSeven eight nine. Ten eleven twelve.";
    let chunker = chunker(8000);
    assert_eq!(chunker.resolve_target(0), 8000);
    assert_eq!(chunker.resolve_target(1200), 1200);

    let segments = chunker.chunk_story(doc, 0).await;
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].word_count, 12);
    assert_eq!(segments, chunker.chunk_story(doc, 8000).await);
}

#[tokio::test]
async fn zero_target_reaches_advisor_as_configured_target() {
    let doc = story();
    let model = Arc::new(ScriptedChatModel::replying("BREAK_PARA: 31"));
    chunker(5000)
        .with_chat_model(model.clone())
        .chunk_story(&doc, 0)
        .await;
    let requests = model.requests().await;
    assert!(requests[0].messages[0]
        .content()
        .contains("Target: ~5000 words per chunk"));
}

#[test]
fn anthropic_client_with_timeout_enables_advice() {
    let config = AnthropicConfig::new("test-key", "claude-test")
        .with_base_url("http://127.0.0.1:9")
        .with_max_tokens(500);
    let chunker = chunker(1000)
        .with_anthropic_config(config, Some(Duration::from_secs(30)))
        .unwrap();
    assert!(matches!(chunker.segmenter(), Segmenter::Advised(_)));
}

#[test]
fn invalid_config_is_rejected() {
    assert!(Chunker::new(ChunkingConfig::new(0)).is_err());
    assert!(Chunker::new(ChunkingConfig::new(1000).with_tolerance(-0.2)).is_err());
}

#[tokio::test]
async fn manifest_summarizes_run() {
    let doc = story();
    let outcome = chunker(1000).chunk(&doc, 1000).await;
    let manifest = ChunkManifest::from_segments("story-42", &outcome.segments, outcome.strategy);

    assert_eq!(manifest.total_chunks, outcome.segments.len());
    assert_eq!(manifest.total_words, 4000);
    assert_eq!(manifest.chunks[0].chunk_number, 1);
    assert_eq!(manifest.chunks[0].key, "story-chunks/story-42/chunk_001.txt");

    let json = serde_json::to_value(&manifest).unwrap();
    assert_eq!(json["chunking_strategy"], "deterministic");
    assert_eq!(json["chunks"][1]["chunk_number"], 2);
}

#[test]
fn chunk_keys_are_zero_padded() {
    assert_eq!(chunk_key("abc", 7), "story-chunks/abc/chunk_007.txt");
    assert_eq!(chunk_key("abc", 1234), "story-chunks/abc/chunk_1234.txt");
}
