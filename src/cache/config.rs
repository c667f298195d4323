use std::path::PathBuf;

use crate::constants::{DEFAULT_CACHE_PATH, DEFAULT_SNAPSHOT_EVERY, EMBEDDING_DIM};

/// Settings for [`EmbeddingCache`](super::EmbeddingCache).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Snapshot file. Default: `./.data/embeddings.rkyv`.
    pub snapshot_path: PathBuf,
    /// New insertions between snapshot requests. Default: `10`.
    pub snapshot_every: u64,
    /// Length of the zero vector returned for blank text and of accepted snapshot vectors.
    pub embedding_dim: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from(DEFAULT_CACHE_PATH),
            snapshot_every: DEFAULT_SNAPSHOT_EVERY,
            embedding_dim: EMBEDDING_DIM,
        }
    }
}

impl CacheConfig {
    /// Creates a config persisting to `snapshot_path`.
    pub fn new<P: Into<PathBuf>>(snapshot_path: P) -> Self {
        Self {
            snapshot_path: snapshot_path.into(),
            ..Default::default()
        }
    }

    /// Overrides the snapshot cadence.
    pub fn with_snapshot_every(mut self, snapshot_every: u64) -> Self {
        self.snapshot_every = snapshot_every;
        self
    }
}
