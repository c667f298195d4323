//! Embedding error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading the sentence model or embedding text.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// The model directory is missing.
    #[error("sentence model not found at {path}")]
    ModelNotFound { path: PathBuf },

    /// Weights, config or tokenizer could not be loaded.
    #[error("failed to load sentence model: {reason}")]
    ModelLoadFailed { reason: String },

    /// The forward pass failed.
    #[error("embedding failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    /// The model produced a vector of unexpected length.
    #[error("embedding has {actual} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid embedder configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl From<candle_core::Error> for EmbeddingError {
    fn from(err: candle_core::Error) -> Self {
        Self::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for EmbeddingError {
    fn from(err: std::io::Error) -> Self {
        Self::ModelLoadFailed {
            reason: err.to_string(),
        }
    }
}
