use thiserror::Error;

use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("similarity feature unavailable: {reason}")]
    FeatureUnavailable { reason: String },

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot serialization failed: {0}")]
    Serialization(String),

    #[error("snapshot rejected: {0}")]
    InvalidSnapshot(String),

    #[error("snapshot worker failed: {0}")]
    Worker(String),
}

pub type CacheResult<T> = Result<T, CacheError>;
