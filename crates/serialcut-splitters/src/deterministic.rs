use serialcut_core::{Segment, SegmentBounds};

use crate::{count_words, split_paragraphs, split_sentences};

/// Separator placed between paragraphs (or sentences) inside one segment.
const JOIN: &str = "\n\n";

/// Greedy paragraph packer. Needs nothing but the text, never fails, and is
/// what every other strategy degrades to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeterministicSegmenter;

impl DeterministicSegmenter {
    pub fn new() -> Self {
        Self
    }

    /// Segments `document` around `target_words`, `tolerance` being the
    /// accepted fraction either side of the target.
    ///
    /// An empty or whitespace-only document yields a single empty segment.
    pub fn segment(&self, document: &str, target_words: usize, tolerance: f64) -> Vec<Segment> {
        self.segment_with_bounds(document, SegmentBounds::new(target_words, tolerance))
    }

    pub fn segment_with_bounds(&self, document: &str, bounds: SegmentBounds) -> Vec<Segment> {
        let mut acc = Accumulator::default();
        let mut segments = Vec::new();

        for paragraph in split_paragraphs(document) {
            let paragraph_words = count_words(paragraph);

            if paragraph_words > bounds.max_words {
                acc.flush_into(&mut segments);
                for sentence in split_sentences(paragraph) {
                    let sentence_words = count_words(sentence);
                    if acc.words + sentence_words > bounds.max_words && !acc.is_empty() {
                        acc.flush_into(&mut segments);
                    }
                    acc.push(sentence, sentence_words);
                }
                continue;
            }

            if acc.words + paragraph_words > bounds.max_words && !acc.is_empty() {
                acc.flush_into(&mut segments);
                acc.push(paragraph, paragraph_words);
            } else {
                acc.push(paragraph, paragraph_words);
                if acc.words >= bounds.min_words {
                    acc.flush_into(&mut segments);
                }
            }
        }
        acc.flush_into(&mut segments);

        if segments.is_empty() {
            segments.push(Segment::empty());
        }

        tracing::debug!(
            segments = segments.len(),
            min_words = bounds.min_words,
            max_words = bounds.max_words,
            "deterministic segmentation finished"
        );
        segments
    }
}

#[derive(Default)]
struct Accumulator<'a> {
    parts: Vec<&'a str>,
    words: usize,
}

impl<'a> Accumulator<'a> {
    fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    fn push(&mut self, part: &'a str, words: usize) {
        self.parts.push(part);
        self.words += words;
    }

    fn flush_into(&mut self, segments: &mut Vec<Segment>) {
        if self.parts.is_empty() {
            return;
        }
        segments.push(Segment::new(self.parts.join(JOIN), self.words));
        self.parts.clear();
        self.words = 0;
    }
}
