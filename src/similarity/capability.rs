use tracing::{info, warn};

use super::error::{SimilarityError, SimilarityResult};
use crate::embedding::SentenceConfig;

/// Whether similarity search can run in this process, decided once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimilarityCapability {
    /// Model files (or the stub) are in place.
    Available {
        /// `true` when the deterministic stub embedder is configured.
        stub: bool,
    },
    /// Every similarity entry point fails fast with this reason.
    Unavailable { reason: String },
}

impl SimilarityCapability {
    /// Checks the embedder configuration without loading the model.
    pub fn probe(config: &SentenceConfig) -> Self {
        match config.validate() {
            Ok(()) => {
                info!(
                    stub = config.testing_stub,
                    model_dir = %config.model_dir.display(),
                    "Similarity search available"
                );
                Self::Available {
                    stub: config.testing_stub,
                }
            }
            Err(e) => {
                warn!(error = %e, "Similarity search unavailable");
                Self::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    /// `Err(FeatureUnavailable)` unless available.
    pub fn ensure(&self) -> SimilarityResult<()> {
        match self {
            Self::Available { .. } => Ok(()),
            Self::Unavailable { reason } => Err(SimilarityError::FeatureUnavailable {
                reason: reason.clone(),
            }),
        }
    }
}

impl std::fmt::Display for SimilarityCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available { stub: false } => write!(f, "AVAILABLE"),
            Self::Available { stub: true } => write!(f, "AVAILABLE (stub)"),
            Self::Unavailable { reason } => write!(f, "UNAVAILABLE ({})", reason),
        }
    }
}
