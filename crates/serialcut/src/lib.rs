//! Serialcut: split long serialized fiction into reading-length segments at
//! narratively coherent boundaries.
//!
//! [`Chunker::chunk_story`] is the entry point. It asks a boundary advisor
//! (usually an LLM) where the story breaks and falls back to deterministic
//! paragraph packing whenever that advice is missing, fails, or is unusable.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `default` | `anthropic` |
//! | `anthropic` | `Chunker::with_anthropic` over the reqwest backend |
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use serialcut::{Chunker, ChunkingConfig};
//!
//! let chunker = Chunker::new(ChunkingConfig::new(8000))?
//!     .with_anthropic(api_key, serialcut::anthropic::DEFAULT_MODEL);
//! let segments = chunker.chunk_story(&story_text, 8000).await;
//! ```

mod chunker;
mod manifest;

pub use chunker::{Chunker, ChunkingOutcome, Segmenter, Strategy};
pub use manifest::{chunk_key, ChunkInfo, ChunkManifest};

pub use serialcut_core::{ChatModel, ChunkingConfig, Segment, SegmentBounds, SerialcutError};

/// Core types: Segment, ChunkingConfig, ChatModel, SerialcutError.
pub use serialcut_core as core;

/// Word counting, paragraph/sentence splitting, recaps, DeterministicSegmenter.
pub use serialcut_splitters as splitters;

/// BoundaryAdvisor, prompt, BREAK_PARA parser, AdvisedSegmenter.
pub use serialcut_advisor as advisor;

/// ProviderBackend seam and ScriptedChatModel.
#[cfg(feature = "anthropic")]
pub use serialcut_models as models;

/// Anthropic ChatModel.
#[cfg(feature = "anthropic")]
pub use serialcut_anthropic as anthropic;
