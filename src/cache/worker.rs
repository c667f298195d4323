use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::EmbeddingCache;
use super::error::{CacheError, CacheResult};
use crate::constants::SNAPSHOT_QUEUE_CAPACITY;

/// Background task writing cache snapshots on request.
///
/// Requests arrive through a bounded queue; a request made while one is already pending is
/// coalesced into it. [`shutdown`](Self::shutdown) closes the queue, waits for the task to
/// drain and writes one final snapshot.
pub struct SnapshotWorker {
    cache: Arc<EmbeddingCache>,
    handle: JoinHandle<()>,
}

impl SnapshotWorker {
    /// Spawns the worker and attaches it to `cache`. Must be called inside a tokio runtime.
    pub fn spawn(cache: Arc<EmbeddingCache>) -> Self {
        let (tx, mut rx) = mpsc::channel(SNAPSHOT_QUEUE_CAPACITY);
        cache.attach_worker(tx);

        let task_cache = Arc::clone(&cache);
        let handle = tokio::spawn(async move {
            while rx.recv().await.is_some() {
                let cache = Arc::clone(&task_cache);
                match tokio::task::spawn_blocking(move || cache.save()).await {
                    Ok(Ok(entries)) => debug!(entries, "Background snapshot complete"),
                    Ok(Err(e)) => warn!(error = %e, "Background snapshot failed"),
                    Err(e) => warn!(error = %e, "Background snapshot task panicked"),
                }
            }
            debug!("Snapshot worker drained");
        });

        info!("Snapshot worker started");
        Self { cache, handle }
    }

    /// Returns `true` if the worker task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stops accepting requests, drains the queue and writes a final snapshot.
    pub async fn shutdown(self) -> CacheResult<usize> {
        self.cache.detach_worker();

        if let Err(e) = self.handle.await {
            warn!(error = %e, "Snapshot worker ended abnormally");
        }

        let cache = self.cache;
        let entries = tokio::task::spawn_blocking(move || cache.save())
            .await
            .map_err(|e| CacheError::Worker(e.to_string()))??;

        info!(entries, "Final embedding snapshot written");
        Ok(entries)
    }
}
