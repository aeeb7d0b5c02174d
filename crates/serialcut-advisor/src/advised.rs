use std::sync::Arc;

use serialcut_core::{ChunkingConfig, Segment, SerialcutError};
use serialcut_splitters::{measure, paragraph_boundaries, DeterministicSegmenter, RecapBuilder};

use crate::BoundaryAdvisor;

/// Cuts a story where a [`BoundaryAdvisor`] says the narrative breaks, and
/// opens every segment after the first with a recap of the one before.
///
/// Holds a [`DeterministicSegmenter`] for when the advice is missing or
/// unusable. With fallback disabled those cases return
/// [`SerialcutError::NoAdvice`] instead.
pub struct AdvisedSegmenter {
    advisor: Arc<dyn BoundaryAdvisor>,
    fallback: DeterministicSegmenter,
    recap: RecapBuilder,
    snap_radius: usize,
    fallback_enabled: bool,
}

impl AdvisedSegmenter {
    pub fn new(advisor: Arc<dyn BoundaryAdvisor>) -> Self {
        Self {
            advisor,
            fallback: DeterministicSegmenter::new(),
            recap: RecapBuilder::default(),
            snap_radius: 2000,
            fallback_enabled: true,
        }
    }

    pub fn from_config(advisor: Arc<dyn BoundaryAdvisor>, config: &ChunkingConfig) -> Self {
        Self::new(advisor)
            .with_recap(RecapBuilder::new(
                config.recap_target_words,
                config.recap_max_sentences,
            ))
            .with_snap_radius(config.snap_radius)
    }

    pub fn with_recap(mut self, recap: RecapBuilder) -> Self {
        self.recap = recap;
        self
    }

    pub fn with_snap_radius(mut self, radius: usize) -> Self {
        self.snap_radius = radius;
        self
    }

    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback_enabled = enabled;
        self
    }

    pub async fn segment(
        &self,
        document: &str,
        target_words: usize,
        tolerance: f64,
    ) -> Result<Vec<Segment>, SerialcutError> {
        if document.trim().is_empty() {
            return Ok(vec![Segment::empty()]);
        }

        let candidates = match self.advisor.find_boundaries(document, target_words).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(error = %e, "boundary advisor failed");
                return self.fall_back(document, target_words, tolerance, e.to_string());
            }
        };

        let offsets: Vec<usize> = candidates.iter().map(|c| c.offset).collect();
        let cuts = snap_cut_points(document, &offsets, self.snap_radius);
        if cuts.len() <= 2 {
            return self.fall_back(
                document,
                target_words,
                tolerance,
                "advisor proposed no usable boundaries".to_string(),
            );
        }

        let segments = build_segments(document, &cuts, &self.recap);
        tracing::info!(
            segments = segments.len(),
            advised = candidates.len(),
            "advised segmentation finished"
        );
        Ok(segments)
    }

    fn fall_back(
        &self,
        document: &str,
        target_words: usize,
        tolerance: f64,
        reason: String,
    ) -> Result<Vec<Segment>, SerialcutError> {
        if !self.fallback_enabled {
            return Err(SerialcutError::NoAdvice(reason));
        }
        tracing::warn!(%reason, "falling back to deterministic segmentation");
        Ok(self.fallback.segment(document, target_words, tolerance))
    }
}

/// Final cut points for `offsets`: each snapped to the nearest paragraph
/// boundary within `radius` bytes (kept as-is when none is that close),
/// plus `0` and `document.len()`. Sorted and strictly increasing.
pub fn snap_cut_points(document: &str, offsets: &[usize], radius: usize) -> Vec<usize> {
    let boundaries = paragraph_boundaries(document);
    let mut cuts = vec![0, document.len()];

    for &offset in offsets {
        let offset = offset.min(document.len());
        let idx = boundaries.partition_point(|&b| b < offset);
        let nearest = [idx.checked_sub(1), Some(idx)]
            .into_iter()
            .flatten()
            .filter_map(|i| boundaries.get(i).copied())
            .filter(|b| b.abs_diff(offset) <= radius)
            .min_by_key(|b| b.abs_diff(offset));
        let cut = match nearest {
            Some(boundary) => boundary,
            None => floor_char_boundary(document, offset),
        };
        cuts.push(cut);
    }

    cuts.sort_unstable();
    cuts.dedup();
    cuts
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Slices `document` between consecutive cut points, trims each slice,
/// drops empty ones, and prepends a recap of the previous slice to every
/// segment after the first.
pub fn build_segments(document: &str, cuts: &[usize], recap: &RecapBuilder) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut previous: Option<&str> = None;

    for window in cuts.windows(2) {
        let body = document[window[0]..window[1]].trim();
        if body.is_empty() {
            continue;
        }
        let text = match previous {
            Some(prev) => recap.prepend(prev, body),
            None => body.to_string(),
        };
        segments.push(measure(text));
        previous = Some(body);
    }

    if segments.is_empty() {
        segments.push(Segment::empty());
    }
    segments
}
