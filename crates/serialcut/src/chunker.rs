use std::fmt;
use std::sync::Arc;
#[cfg(feature = "anthropic")]
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serialcut_advisor::{AdvisedSegmenter, BoundaryAdvisor, ChatBoundaryAdvisor};
use serialcut_core::{ChatModel, ChunkingConfig, Segment, SerialcutError};
use serialcut_splitters::DeterministicSegmenter;

/// Which strategy produced a set of segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Deterministic,
    Advised,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Deterministic => f.write_str("deterministic"),
            Strategy::Advised => f.write_str("advised"),
        }
    }
}

/// The segmentation strategies behind one interface.
pub enum Segmenter {
    Deterministic(DeterministicSegmenter),
    Advised(AdvisedSegmenter),
}

impl Segmenter {
    pub fn strategy(&self) -> Strategy {
        match self {
            Segmenter::Deterministic(_) => Strategy::Deterministic,
            Segmenter::Advised(_) => Strategy::Advised,
        }
    }

    pub async fn segment(
        &self,
        document: &str,
        target_words: usize,
        tolerance: f64,
    ) -> Result<Vec<Segment>, SerialcutError> {
        match self {
            Segmenter::Deterministic(s) => Ok(s.segment(document, target_words, tolerance)),
            Segmenter::Advised(s) => s.segment(document, target_words, tolerance).await,
        }
    }
}

/// Segments together with the strategy that actually produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkingOutcome {
    pub segments: Vec<Segment>,
    pub strategy: Strategy,
}

/// Public entry point: picks the advised strategy when an advisor is
/// configured and enabled, and otherwise, or whenever it fails, the
/// deterministic one.
pub struct Chunker {
    config: ChunkingConfig,
    advisor: Option<Arc<dyn BoundaryAdvisor>>,
}

impl Chunker {
    pub fn new(config: ChunkingConfig) -> Result<Self, SerialcutError> {
        config.validate()?;
        Ok(Self {
            config,
            advisor: None,
        })
    }

    pub fn with_advisor(mut self, advisor: Arc<dyn BoundaryAdvisor>) -> Self {
        self.advisor = Some(advisor);
        self
    }

    /// Uses `model` for boundary advice, with thresholds taken from the
    /// chunker's config.
    pub fn with_chat_model(self, model: Arc<dyn ChatModel>) -> Self {
        let advisor = ChatBoundaryAdvisor::new(model)
            .with_min_trailing_words(self.config.min_trailing_words)
            .with_max_prompt_chars(self.config.max_prompt_chars);
        self.with_advisor(Arc::new(advisor))
    }

    /// Uses Anthropic's Messages API over HTTP for boundary advice.
    #[cfg(feature = "anthropic")]
    pub fn with_anthropic(self, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        use serialcut_anthropic::{AnthropicChatModel, AnthropicConfig};
        use serialcut_models::HttpBackend;

        let config = AnthropicConfig::new(api_key, model);
        let chat_model = AnthropicChatModel::new(config, Arc::new(HttpBackend::new()));
        self.with_chat_model(Arc::new(chat_model))
    }

    /// Like [`with_anthropic`](Self::with_anthropic), with a full client
    /// config and an optional per-request timeout. A request that times out
    /// counts as failed advice.
    #[cfg(feature = "anthropic")]
    pub fn with_anthropic_config(
        self,
        config: serialcut_anthropic::AnthropicConfig,
        timeout: Option<Duration>,
    ) -> Result<Self, SerialcutError> {
        use serialcut_anthropic::AnthropicChatModel;
        use serialcut_models::HttpBackend;

        let backend = match timeout {
            Some(timeout) => HttpBackend::with_timeout(timeout)?,
            None => HttpBackend::new(),
        };
        let chat_model = AnthropicChatModel::new(config, Arc::new(backend));
        Ok(self.with_chat_model(Arc::new(chat_model)))
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// The strategy that will be tried first.
    pub fn segmenter(&self) -> Segmenter {
        match &self.advisor {
            Some(advisor) if self.config.use_advisor => Segmenter::Advised(
                AdvisedSegmenter::from_config(advisor.clone(), &self.config).with_fallback(false),
            ),
            _ => Segmenter::Deterministic(DeterministicSegmenter::new()),
        }
    }

    /// The target a call actually uses: `target_words`, or the configured
    /// `target_words` when the argument is 0.
    pub fn resolve_target(&self, target_words: usize) -> usize {
        if target_words == 0 {
            self.config.target_words
        } else {
            target_words
        }
    }

    /// Splits `document` into segments of about `target_words` words.
    /// Pass 0 to use the configured target.
    ///
    /// Never fails: an empty or whitespace-only document gives one empty
    /// segment, anything else at least one non-empty segment.
    pub async fn chunk_story(&self, document: &str, target_words: usize) -> Vec<Segment> {
        self.chunk(document, target_words).await.segments
    }

    /// Like [`chunk_story`](Self::chunk_story), also reporting the strategy used.
    pub async fn chunk(&self, document: &str, target_words: usize) -> ChunkingOutcome {
        let target_words = self.resolve_target(target_words);
        let tolerance = self.config.tolerance;
        let deterministic = DeterministicSegmenter::new();

        if document.trim().is_empty() {
            return ChunkingOutcome {
                segments: vec![Segment::empty()],
                strategy: Strategy::Deterministic,
            };
        }

        let segmenter = self.segmenter();
        let strategy = segmenter.strategy();
        tracing::info!(%strategy, target_words, tolerance, "chunking story");

        match segmenter.segment(document, target_words, tolerance).await {
            Ok(segments) => ChunkingOutcome { segments, strategy },
            Err(e) => {
                tracing::warn!(error = %e, "advised chunking failed, using deterministic fallback");
                ChunkingOutcome {
                    segments: deterministic.segment(document, target_words, tolerance),
                    strategy: Strategy::Deterministic,
                }
            }
        }
    }
}
