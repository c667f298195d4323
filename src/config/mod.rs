//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `TRIAGE_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::{Path, PathBuf};

use crate::cache::CacheConfig;
use crate::embedding::SentenceConfig;
use crate::inference::InferenceConfig;

/// Process configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `TRIAGE_*` overrides on top of defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Inference server, model and timeout (`TRIAGE_OLLAMA_URL`, `TRIAGE_OLLAMA_MODEL`,
    /// `TRIAGE_INFERENCE_TIMEOUT_SECS`).
    pub inference: InferenceConfig,

    /// Sentence embedder (`TRIAGE_EMBEDDING_MODEL_PATH`, `TRIAGE_EMBEDDER_STUB`).
    pub embedder: SentenceConfig,

    /// Embedding snapshot file and cadence (`TRIAGE_CACHE_PATH`, `TRIAGE_SNAPSHOT_EVERY`).
    pub cache: CacheConfig,
}

impl Config {
    const ENV_CACHE_PATH: &'static str = "TRIAGE_CACHE_PATH";
    const ENV_SNAPSHOT_EVERY: &'static str = "TRIAGE_SNAPSHOT_EVERY";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let inference = InferenceConfig::from_env()?;
        let embedder = SentenceConfig::from_env();

        let defaults = CacheConfig::default();
        let cache = CacheConfig {
            snapshot_path: Self::parse_path_from_env(Self::ENV_CACHE_PATH, defaults.snapshot_path),
            snapshot_every: Self::parse_u64_from_env(
                Self::ENV_SNAPSHOT_EVERY,
                defaults.snapshot_every,
            )?,
            embedding_dim: embedder.embedding_dim,
        };

        Ok(Self {
            inference,
            embedder,
            cache,
        })
    }

    /// Stub embedder, snapshot under `dir`, default inference settings. For tests and demos.
    pub fn stub(dir: &Path) -> Self {
        Self {
            inference: InferenceConfig::default(),
            embedder: SentenceConfig::stub(),
            cache: CacheConfig::new(dir.join("embeddings.rkyv")),
        }
    }

    /// Validates paths and basic invariants (does not create directories or load models).
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.inference.validate()?;

        if self.cache.snapshot_every == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_SNAPSHOT_EVERY,
                reason: "must be at least 1".to_string(),
            });
        }

        if self.cache.embedding_dim != self.embedder.embedding_dim {
            return Err(ConfigError::InvalidValue {
                name: "embedding_dim",
                reason: format!(
                    "cache expects {} but embedder produces {}",
                    self.cache.embedding_dim, self.embedder.embedding_dim
                ),
            });
        }

        let snapshot = &self.cache.snapshot_path;
        if snapshot.exists() && !snapshot.is_file() {
            return Err(ConfigError::NotAFile {
                path: snapshot.clone(),
            });
        }

        let model_dir = &self.embedder.model_dir;
        if !self.embedder.testing_stub && !model_dir.as_os_str().is_empty() {
            if !model_dir.exists() {
                return Err(ConfigError::PathNotFound {
                    path: model_dir.clone(),
                });
            }
            if !model_dir.is_dir() {
                return Err(ConfigError::NotADirectory {
                    path: model_dir.clone(),
                });
            }
        }

        Ok(())
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::InvalidNumber {
                    name: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }
}
