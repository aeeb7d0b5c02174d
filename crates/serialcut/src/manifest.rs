use serde::{Deserialize, Serialize};
use serialcut_core::Segment;

use crate::Strategy;

/// Storage key for chunk `number` (1-based) of a story.
pub fn chunk_key(story_id: &str, number: usize) -> String {
    format!("story-chunks/{story_id}/chunk_{number:03}.txt")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkInfo {
    pub chunk_number: usize,
    pub key: String,
    pub word_count: usize,
}

/// Summary of one chunking run, handed to the storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkManifest {
    pub story_id: String,
    pub chunks: Vec<ChunkInfo>,
    pub total_chunks: usize,
    pub total_words: usize,
    pub chunking_strategy: Strategy,
}

impl ChunkManifest {
    pub fn from_segments(
        story_id: impl Into<String>,
        segments: &[Segment],
        strategy: Strategy,
    ) -> Self {
        let story_id = story_id.into();
        let chunks: Vec<ChunkInfo> = segments
            .iter()
            .enumerate()
            .map(|(i, segment)| ChunkInfo {
                chunk_number: i + 1,
                key: chunk_key(&story_id, i + 1),
                word_count: segment.word_count,
            })
            .collect();
        Self {
            total_chunks: chunks.len(),
            total_words: chunks.iter().map(|c| c.word_count).sum(),
            story_id,
            chunks,
            chunking_strategy: strategy,
        }
    }
}
