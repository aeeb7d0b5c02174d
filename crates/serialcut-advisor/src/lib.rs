//! Narrative boundary advice from a text-understanding service, and the
//! segmenter that cuts a story along it.

mod advised;
mod advisor;
mod parser;
mod prompt;

pub use advised::{build_segments, snap_cut_points, AdvisedSegmenter};
pub use advisor::{resolve_candidates, BoundaryAdvisor, BoundaryCandidate, ChatBoundaryAdvisor};
pub use parser::{AdvisorReply, BreakLine, BreakLineParser, ReplyLine};
pub use prompt::{BoundaryPrompt, TRUNCATION_MARKER};
