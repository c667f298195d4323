//! Similarity scoring.
//!
//! A candidate's score blends the cosine similarity of the two embeddings with a bonus for
//! agreeing categorical metadata:
//!
//! ```text
//! bonus = 0.15·[system_component] + 0.10·[failure_mode] + 0.05·[level2]
//! score = clamp(0.7·cosine + 0.3·bonus, 0, 1)
//! ```
//!
//! A field only counts as agreeing when both sides are set and equal.

pub mod scorer;
pub mod types;


pub use scorer::{SimilarityScorer, cosine_similarity};
pub use types::{ScoreBreakdown, ScoreWeights, ScoringMetadata};
