use std::sync::Arc;

use async_trait::async_trait;
use serialcut_core::{ChatModel, ChatRequest, Message, SerialcutError};
use serialcut_splitters::{count_words, paragraph_units, Paragraph};

use crate::{AdvisorReply, BoundaryPrompt, BreakLine, BreakLineParser};

/// A proposed cut: the byte offset where the next segment would begin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryCandidate {
    pub offset: usize,
    /// Paragraph the offset belongs to, when it came from paragraph advice.
    pub paragraph: Option<usize>,
    pub reason: Option<String>,
}

impl BoundaryCandidate {
    pub fn at(offset: usize) -> Self {
        Self {
            offset,
            paragraph: None,
            reason: None,
        }
    }
}

/// Source of narrative boundary advice.
///
/// An `Err` or an empty list both mean "no advice available"; the caller
/// decides what to do about it.
#[async_trait]
pub trait BoundaryAdvisor: Send + Sync {
    /// Candidates sorted by offset, without duplicate offsets.
    async fn find_boundaries(
        &self,
        document: &str,
        target_words: usize,
    ) -> Result<Vec<BoundaryCandidate>, SerialcutError>;
}

/// Asks a [`ChatModel`] where the story should break.
pub struct ChatBoundaryAdvisor {
    model: Arc<dyn ChatModel>,
    parser: BreakLineParser,
    min_trailing_words: usize,
    max_prompt_chars: usize,
    max_tokens: u32,
}

impl ChatBoundaryAdvisor {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            parser: BreakLineParser::new(),
            min_trailing_words: 500,
            max_prompt_chars: 100_000,
            max_tokens: 2000,
        }
    }

    pub fn with_min_trailing_words(mut self, words: usize) -> Self {
        self.min_trailing_words = words;
        self
    }

    pub fn with_max_prompt_chars(mut self, chars: usize) -> Self {
        self.max_prompt_chars = chars;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl BoundaryAdvisor for ChatBoundaryAdvisor {
    async fn find_boundaries(
        &self,
        document: &str,
        target_words: usize,
    ) -> Result<Vec<BoundaryCandidate>, SerialcutError> {
        let paragraphs = paragraph_units(document);
        if paragraphs.is_empty() {
            return Ok(Vec::new());
        }

        let total_words = count_words(document);
        let prompt = BoundaryPrompt::new(target_words, self.max_prompt_chars)
            .render(&paragraphs, total_words)?;
        let request =
            ChatRequest::new(vec![Message::human(prompt)]).with_max_tokens(self.max_tokens);

        tracing::info!(
            model = self.model.model_name(),
            paragraphs = paragraphs.len(),
            total_words,
            target_words,
            "requesting boundary advice"
        );
        let response = self.model.chat(request).await?;
        let text = response.message.content();
        tracing::debug!(response = %text, "boundary advice received");

        match self.parser.parse(text) {
            AdvisorReply::NoBreaksNeeded => {
                tracing::info!("advisor reported no breaks needed");
                Ok(Vec::new())
            }
            AdvisorReply::Breaks(lines) => Ok(resolve_candidates(
                &paragraphs,
                &lines,
                self.min_trailing_words,
            )),
        }
    }
}

/// Maps advised paragraph numbers to offsets.
///
/// Numbers outside `1..=paragraphs.len()` are skipped, as is any break that
/// would leave fewer than `min_trailing_words` words after it. The result is
/// sorted by offset with duplicates removed.
pub fn resolve_candidates(
    paragraphs: &[Paragraph<'_>],
    lines: &[BreakLine],
    min_trailing_words: usize,
) -> Vec<BoundaryCandidate> {
    // Words from each paragraph to the end of the document.
    let mut trailing = vec![0; paragraphs.len() + 1];
    for (i, p) in paragraphs.iter().enumerate().rev() {
        trailing[i] = trailing[i + 1] + count_words(p.text);
    }

    let mut candidates = Vec::new();
    for line in lines {
        let Some(index) = line.paragraph.checked_sub(1).filter(|i| *i < paragraphs.len()) else {
            tracing::warn!(paragraph = line.paragraph, "ignoring break at unknown paragraph");
            continue;
        };
        let remaining = trailing[index];
        if remaining < min_trailing_words {
            tracing::warn!(
                paragraph = line.paragraph,
                remaining_words = remaining,
                "skipping break that would leave a tiny final segment"
            );
            continue;
        }
        let offset = paragraphs[index].offset;
        tracing::info!(
            paragraph = line.paragraph,
            offset,
            reason = line.reason.as_deref().unwrap_or(""),
            "accepted advised break"
        );
        candidates.push(BoundaryCandidate {
            offset,
            paragraph: Some(line.paragraph),
            reason: line.reason.clone(),
        });
    }

    candidates.sort_by_key(|c| c.offset);
    candidates.dedup_by_key(|c| c.offset);
    candidates
}
