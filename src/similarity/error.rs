use thiserror::Error;

use crate::cache::CacheError;

#[derive(Debug, Error)]
pub enum SimilarityError {
    #[error("similarity search unavailable: {reason}")]
    FeatureUnavailable { reason: String },

    #[error("embedding cache error: {0}")]
    Cache(CacheError),
}

impl From<CacheError> for SimilarityError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::FeatureUnavailable { reason } => Self::FeatureUnavailable { reason },
            other => Self::Cache(other),
        }
    }
}

pub type SimilarityResult<T> = Result<T, SimilarityError>;
