//! Complaint id to embedding vector cache with snapshot persistence.
//!
//! Entries are created on first request for an id and never evicted. The table lock is held
//! across the miss path, so concurrent callers asking for the same missing id run inference
//! once and share the result. Model construction is single-flighted separately by
//! [`LazyEmbedder`].

pub mod config;
pub mod error;
pub mod snapshot;
mod worker;

#[cfg(test)]
mod tests;

pub use config::CacheConfig;
pub use error::{CacheError, CacheResult};
pub use snapshot::{EmbeddingSnapshot, SnapshotEntry, read_snapshot, write_snapshot};
pub use worker::SnapshotWorker;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};

use crate::embedding::LazyEmbedder;
use crate::hashing::{TextFingerprint, fingerprint_text};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CachedEmbedding {
    pub(crate) vector: Vec<f32>,
    pub(crate) fingerprint: TextFingerprint,
}

/// Marker sent to the snapshot worker.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SnapshotRequest;

/// Embedding cache shared by every similarity request.
///
/// The table lock is held across model construction and inference on a miss, so all embedding
/// work is serialized and a caller that only needs cache hits waits behind an in-flight miss.
/// Concurrent misses for one id compute once.
pub struct EmbeddingCache {
    config: CacheConfig,
    embedder: LazyEmbedder,
    entries: Mutex<HashMap<String, CachedEmbedding>>,
    persist_lock: Mutex<()>,
    inserts: AtomicU64,
    snapshot_tx: Mutex<Option<mpsc::Sender<SnapshotRequest>>>,
}

impl std::fmt::Debug for EmbeddingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingCache")
            .field("snapshot_path", &self.config.snapshot_path)
            .field("entries", &self.len())
            .field("embedder", &self.embedder)
            .finish()
    }
}

impl EmbeddingCache {
    /// Creates an empty cache. Call [`load`](Self::load) to restore a snapshot.
    pub fn new(config: CacheConfig, embedder: LazyEmbedder) -> Self {
        Self {
            config,
            embedder,
            entries: Mutex::new(HashMap::new()),
            persist_lock: Mutex::new(()),
            inserts: AtomicU64::new(0),
            snapshot_tx: Mutex::new(None),
        }
    }

    /// Returns the active config.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the cached vector for `id`, computing and storing it from `text` on a miss.
    ///
    /// Blank text yields a zero vector without touching the model and is not stored. Blocks
    /// while another caller is computing a miss.
    pub fn get_or_compute(&self, id: &str, text: &str) -> CacheResult<Vec<f32>> {
        let mut entries = self.entries.lock();

        if let Some(cached) = entries.get(id) {
            debug!(id, "Embedding cache hit");
            return Ok(cached.vector.clone());
        }

        if text.trim().is_empty() {
            debug!(id, "Blank complaint text, using zero vector");
            return Ok(vec![0.0; self.config.embedding_dim]);
        }

        let embedder = self
            .embedder
            .get()
            .map_err(|e| CacheError::FeatureUnavailable {
                reason: e.to_string(),
            })?;

        let vector = embedder.embed(text)?;
        entries.insert(
            id.to_string(),
            CachedEmbedding {
                vector: vector.clone(),
                fingerprint: fingerprint_text(text),
            },
        );
        let len = entries.len();
        drop(entries);

        debug!(id, entries = len, "Embedding cached");
        self.record_insert();
        Ok(vector)
    }

    fn record_insert(&self) {
        let every = self.config.snapshot_every;
        let inserted = self.inserts.fetch_add(1, Ordering::Relaxed) + 1;
        if every > 0 && inserted.is_multiple_of(every) {
            self.request_snapshot();
        }
    }

    /// Asks the snapshot worker for a snapshot without waiting. Returns `false` when no
    /// worker is attached.
    pub fn request_snapshot(&self) -> bool {
        let guard = self.snapshot_tx.lock();
        let Some(tx) = guard.as_ref() else {
            debug!("No snapshot worker attached, skipping snapshot request");
            return false;
        };

        match tx.try_send(SnapshotRequest) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!("Snapshot already pending");
                true
            }
            Err(TrySendError::Closed(_)) => {
                warn!("Snapshot worker has stopped, request dropped");
                false
            }
        }
    }

    pub(crate) fn attach_worker(&self, tx: mpsc::Sender<SnapshotRequest>) {
        *self.snapshot_tx.lock() = Some(tx);
    }

    pub(crate) fn detach_worker(&self) -> bool {
        self.snapshot_tx.lock().take().is_some()
    }

    /// Writes the whole table to the snapshot file. Returns the number of entries written.
    ///
    /// The table is copied under its lock and written without holding it.
    pub fn save(&self) -> CacheResult<usize> {
        let _persist = self.persist_lock.lock();

        let snapshot = {
            let entries = self.entries.lock();
            EmbeddingSnapshot::from_table(self.config.embedding_dim, &entries)
        };

        let bytes = write_snapshot(&self.config.snapshot_path, &snapshot)?;
        info!(
            path = %self.config.snapshot_path.display(),
            entries = snapshot.entries.len(),
            bytes,
            "Embedding snapshot written"
        );
        Ok(snapshot.entries.len())
    }

    /// Replaces the table with the snapshot on disk. Returns the number of entries restored.
    ///
    /// A missing, empty or unreadable file leaves the table untouched.
    pub fn load(&self) -> usize {
        let path = &self.config.snapshot_path;
        let snapshot = match read_snapshot(path, self.config.embedding_dim) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                info!(path = %path.display(), "No embedding snapshot found, starting empty");
                return 0;
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Embedding snapshot unreadable, starting empty"
                );
                return 0;
            }
        };

        let dim = self.config.embedding_dim;
        let total = snapshot.entries.len();
        let restored: HashMap<String, CachedEmbedding> = snapshot
            .entries
            .into_iter()
            .filter(|entry| entry.vector.len() == dim)
            .map(|entry| {
                (
                    entry.id,
                    CachedEmbedding {
                        vector: entry.vector,
                        fingerprint: entry.fingerprint,
                    },
                )
            })
            .collect();

        if restored.len() < total {
            warn!(
                expected_dim = dim,
                dropped = total - restored.len(),
                "Dropped snapshot entries with unexpected dimension"
            );
        }

        let count = restored.len();
        *self.entries.lock() = restored;
        info!(path = %path.display(), entries = count, "Embedding snapshot loaded");
        count
    }

    /// Drops the cached vector for `id`. Returns `true` if one was present.
    pub fn invalidate(&self, id: &str) -> bool {
        let removed = self.entries.lock().remove(id).is_some();
        if removed {
            debug!(id, "Embedding invalidated");
        }
        removed
    }

    /// Whether `text` differs from the text the cached vector for `id` was computed from.
    /// `None` when nothing is cached for `id`.
    pub fn is_stale(&self, id: &str, text: &str) -> Option<bool> {
        let fingerprint = fingerprint_text(text);
        self.entries
            .lock()
            .get(id)
            .map(|cached| cached.fingerprint != fingerprint)
    }

    /// Returns `true` if `id` has a cached vector.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.lock().contains_key(id)
    }

    /// Number of cached vectors.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` once the shared embedding model has been built.
    pub fn embedder_initialized(&self) -> bool {
        self.embedder.is_initialized()
    }
}
