//! Text splitting primitives and the deterministic segmenter.
//!
//! Every size decision in Serialcut goes through [`count_words`], so a
//! fragment yields the same count no matter which component measures it.

mod deterministic;
mod paragraph;
mod recap;
mod sentence;
mod words;

pub use deterministic::DeterministicSegmenter;
pub use paragraph::{paragraph_boundaries, paragraph_units, split_paragraphs, Paragraph};
pub use recap::{strip_recap, RecapBuilder, RECAP_LABEL, RECAP_RULE};
pub use sentence::split_sentences;
pub use words::{count_words, measure};

// Re-export Segment from core so splitter users need a single import.
pub use serialcut_core::{Segment, SegmentBounds};
