//! Similar-complaint retrieval.
//!
//! [`SimilarityEngine::find_similar`] embeds the target and every other record through the
//! shared [`EmbeddingCache`](crate::cache::EmbeddingCache), scores each pair with
//! [`SimilarityScorer`](crate::scoring::SimilarityScorer) and returns the best matches at or
//! above the `0.5` cutoff.

pub mod capability;
pub mod engine;
pub mod error;
pub mod types;


pub use capability::SimilarityCapability;
pub use engine::{SimilarityEngine, rank_candidates};
pub use error::{SimilarityError, SimilarityResult};
pub use types::SimilarityCandidate;
