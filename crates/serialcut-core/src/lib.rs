use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// One reading-length piece of a story: its text and the word count of that
/// text (recap included, when one was prepended).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub word_count: usize,
}

impl Segment {
    pub fn new(text: impl Into<String>, word_count: usize) -> Self {
        Self {
            text: text.into(),
            word_count,
        }
    }

    /// The result for an empty or whitespace-only document.
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            word_count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl From<Segment> for (String, usize) {
    fn from(segment: Segment) -> Self {
        (segment.text, segment.word_count)
    }
}

// ---------------------------------------------------------------------------
// Size bounds
// ---------------------------------------------------------------------------

/// Word-count window derived from a target size and a tolerance fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentBounds {
    pub target_words: usize,
    pub min_words: usize,
    pub max_words: usize,
}

impl SegmentBounds {
    /// `min = floor(target * (1 - tolerance))`, `max = floor(target * (1 + tolerance))`.
    ///
    /// Out-of-range inputs are clamped (target to at least 1, tolerance to
    /// `[0, 0.95]`) so this never fails.
    pub fn new(target_words: usize, tolerance: f64) -> Self {
        let target_words = target_words.max(1);
        let tolerance = if tolerance.is_finite() {
            tolerance.clamp(0.0, 0.95)
        } else {
            0.0
        };
        let target = target_words as f64;
        let min_words = ((target * (1.0 - tolerance)) as usize).max(1);
        let max_words = ((target * (1.0 + tolerance)) as usize).max(min_words);
        Self {
            target_words,
            min_words,
            max_words,
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tunables for one chunking call. Passed explicitly; library code never
/// reads process environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub target_words: usize,
    pub tolerance: f64,
    /// An advised boundary is dropped when fewer words than this follow it.
    pub min_trailing_words: usize,
    /// Maximum distance, in bytes, an advised offset may move to land on a
    /// paragraph boundary.
    pub snap_radius: usize,
    pub recap_target_words: usize,
    pub recap_max_sentences: usize,
    /// Numbered story text in the advisory prompt is truncated past this.
    pub max_prompt_chars: usize,
    /// Allow the advised strategy when an advisor is available.
    pub use_advisor: bool,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            target_words: 8000,
            tolerance: 0.1,
            min_trailing_words: 500,
            snap_radius: 2000,
            recap_target_words: 250,
            recap_max_sentences: 10,
            max_prompt_chars: 100_000,
            use_advisor: true,
        }
    }
}

impl ChunkingConfig {
    pub fn new(target_words: usize) -> Self {
        Self {
            target_words,
            ..Self::default()
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_min_trailing_words(mut self, words: usize) -> Self {
        self.min_trailing_words = words;
        self
    }

    pub fn with_snap_radius(mut self, radius: usize) -> Self {
        self.snap_radius = radius;
        self
    }

    pub fn with_recap(mut self, target_words: usize, max_sentences: usize) -> Self {
        self.recap_target_words = target_words;
        self.recap_max_sentences = max_sentences;
        self
    }

    pub fn with_max_prompt_chars(mut self, chars: usize) -> Self {
        self.max_prompt_chars = chars;
        self
    }

    pub fn with_advisor(mut self, enabled: bool) -> Self {
        self.use_advisor = enabled;
        self
    }

    pub fn bounds(&self) -> SegmentBounds {
        SegmentBounds::new(self.target_words, self.tolerance)
    }

    pub fn validate(&self) -> Result<(), SerialcutError> {
        if self.target_words == 0 {
            return Err(SerialcutError::Config(
                "target_words must be positive".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.tolerance) {
            return Err(SerialcutError::Config(format!(
                "tolerance must be in [0, 1), got {}",
                self.tolerance
            )));
        }
        if self.recap_max_sentences == 0 {
            return Err(SerialcutError::Config(
                "recap_max_sentences must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A chat message exchanged with the text-understanding service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role")]
pub enum Message {
    #[serde(rename = "system")]
    System { content: String },
    #[serde(rename = "human")]
    Human { content: String },
    #[serde(rename = "assistant")]
    AI {
        content: String,
        #[serde(default, skip_serializing_if = "HashMap::is_empty")]
        response_metadata: HashMap<String, Value>,
    },
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message::System {
            content: content.into(),
        }
    }

    pub fn human(content: impl Into<String>) -> Self {
        Message::Human {
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Message::AI {
            content: content.into(),
            response_metadata: HashMap::new(),
        }
    }

    pub fn with_response_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        if let Message::AI {
            response_metadata, ..
        } = &mut self
        {
            response_metadata.insert(key.into(), value);
        }
        self
    }

    pub fn content(&self) -> &str {
        match self {
            Message::System { content } | Message::Human { content } => content,
            Message::AI { content, .. } => content,
        }
    }

    pub fn role(&self) -> &'static str {
        match self {
            Message::System { .. } => "system",
            Message::Human { .. } => "human",
            Message::AI { .. } => "assistant",
        }
    }

    pub fn is_ai(&self) -> bool {
        matches!(self, Message::AI { .. })
    }
}

// ---------------------------------------------------------------------------
// Chat request / response
// ---------------------------------------------------------------------------

/// A single prompt round trip to a chat model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// A response from a chat model containing the AI message and optional token usage statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: Message,
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Unified error type for Serialcut.
#[derive(Debug, Error)]
pub enum SerialcutError {
    #[error("model error: {0}")]
    Model(String),
    #[error("rate limit: {0}")]
    RateLimit(String),
    #[error("timeout: {0}")]
    Timeout(String),
    #[error("parsing error: {0}")]
    Parsing(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("no boundary advice: {0}")]
    NoAdvice(String),
}

// ---------------------------------------------------------------------------
// Core traits
// ---------------------------------------------------------------------------

/// The text-understanding service. One prompt in, one buffered response out.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, SerialcutError>;

    /// Human-readable model identifier, used in logs.
    fn model_name(&self) -> &str {
        "unknown"
    }
}
