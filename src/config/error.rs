//! Errors raised while reading `TRIAGE_*` settings.

use std::path::PathBuf;
use thiserror::Error;

use crate::inference::InferenceError;

/// Rejected configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric environment variable could not be parsed.
    #[error("failed to parse {name}='{value}': {source}")]
    InvalidNumber {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// A setting is present but outside its allowed range.
    #[error("invalid {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },

    /// Inference settings were rejected.
    #[error("inference configuration: {0}")]
    Inference(#[from] InferenceError),

    /// The embedding model directory is missing.
    #[error("model directory not found: {path}")]
    PathNotFound { path: PathBuf },

    /// The snapshot path points at something other than a file.
    #[error("snapshot path is not a file: {path}")]
    NotAFile { path: PathBuf },

    /// The embedding model path is not a directory.
    #[error("model path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
