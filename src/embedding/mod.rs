//! Embedding model utilities.
//!
//! - [`sentence`] provides the BERT sentence embedder (and its stub).
//! - [`LazyEmbedder`] single-flights model construction for every caller of the cache.

/// BERT encoder with mean pooling.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
mod lazy;
#[cfg(any(test, feature = "mock"))]
mod mock;
/// Sentence embedder.
pub mod sentence;
/// Tokenizer loading and vector helpers.
pub mod utils;

use std::sync::Arc;

pub use error::EmbeddingError;
pub use lazy::LazyEmbedder;
#[cfg(any(test, feature = "mock"))]
pub use mock::{CountingEmbedder, CountingFactory, FailingFactory};
pub use sentence::{SENTENCE_EMBEDDING_DIM, SentenceConfig, SentenceEmbedder};

/// Turns text into a fixed-length vector.
pub trait TextEmbedder: Send + Sync {
    /// Embeds a single string.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Output dimension.
    fn embedding_dim(&self) -> usize;
}

/// Builds the shared embedder on first use.
pub trait EmbedderFactory: Send + Sync {
    fn build(&self) -> Result<Arc<dyn TextEmbedder>, EmbeddingError>;
}
