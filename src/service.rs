//! The triage service: one owner for the embedder, the cache, the snapshot worker and the
//! classifier.
//!
//! Construct it once at startup (inside a tokio runtime) and share it by reference or `Arc`.
//! Call [`TriageService::shutdown`] before exiting so the last cache insertions reach disk.

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{info, warn};

use crate::cache::{CacheResult, EmbeddingCache, SnapshotWorker};
use crate::classify::{BatchReport, Classifier, ClassifyResult};
use crate::config::{Config, ConfigError};
use crate::embedding::LazyEmbedder;
use crate::inference::{
    InferenceBackend, InferenceError, InferenceResult, ModelInfo, OllamaClient,
};
use crate::parser::ParsedReply;
use crate::record::{ClassificationProgress, ComplaintRecord};
use crate::scoring::SimilarityScorer;
use crate::similarity::{SimilarityCandidate, SimilarityCapability, SimilarityEngine, SimilarityResult};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("inference client error: {0}")]
    Inference(#[from] InferenceError),
}

/// Complaint triage entry points.
pub struct TriageService<B = OllamaClient> {
    config: Config,
    cache: Arc<EmbeddingCache>,
    similarity: SimilarityEngine,
    classifier: Classifier<B>,
    worker: Mutex<Option<SnapshotWorker>>,
}

impl<B> std::fmt::Debug for TriageService<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriageService")
            .field("capability", self.similarity.capability())
            .field("cache", &self.cache)
            .field("worker_running", &self.worker.lock().is_some())
            .finish()
    }
}

impl TriageService<OllamaClient> {
    /// Starts the service against the configured Ollama server.
    pub fn start(config: Config) -> Result<Self, ServiceError> {
        let backend = OllamaClient::new(config.inference.clone())?;
        Self::with_backend(config, backend)
    }
}

impl<B: InferenceBackend> TriageService<B> {
    /// Starts the service with a custom inference backend.
    pub fn with_backend(config: Config, backend: B) -> Result<Self, ServiceError> {
        config.validate()?;
        let capability = SimilarityCapability::probe(&config.embedder);
        let embedder = LazyEmbedder::new(config.embedder.clone());
        Ok(Self::assemble(config, backend, embedder, capability))
    }

    /// Starts the service from explicit parts (no config validation or capability probe).
    pub fn from_parts(
        config: Config,
        backend: B,
        embedder: LazyEmbedder,
        capability: SimilarityCapability,
    ) -> Self {
        Self::assemble(config, backend, embedder, capability)
    }

    fn assemble(
        config: Config,
        backend: B,
        embedder: LazyEmbedder,
        capability: SimilarityCapability,
    ) -> Self {
        let cache = Arc::new(EmbeddingCache::new(config.cache.clone(), embedder));
        let restored = cache.load();
        let worker = SnapshotWorker::spawn(Arc::clone(&cache));

        let similarity = SimilarityEngine::new(
            Arc::clone(&cache),
            SimilarityScorer::default(),
            capability,
        );

        info!(
            capability = %similarity.capability(),
            restored_embeddings = restored,
            model = backend.model(),
            "Triage service started"
        );

        Self {
            config,
            cache,
            similarity,
            classifier: Classifier::new(backend),
            worker: Mutex::new(Some(worker)),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn capability(&self) -> &SimilarityCapability {
        self.similarity.capability()
    }

    pub fn cache(&self) -> &Arc<EmbeddingCache> {
        &self.cache
    }

    pub fn classifier(&self) -> &Classifier<B> {
        &self.classifier
    }

    /// Ranks `corpus` against `target_id`. Blocks on embedding inference.
    pub fn find_similar(
        &self,
        target_id: &str,
        corpus: &[ComplaintRecord],
        limit: usize,
    ) -> SimilarityResult<Vec<SimilarityCandidate>> {
        self.similarity.find_similar(target_id, corpus, limit)
    }

    /// Classifies one record, writing the result onto it on success.
    pub async fn classify(&self, record: &mut ComplaintRecord) -> ClassifyResult<ParsedReply> {
        self.classifier.classify(record).await
    }

    /// Classifies the unclassified records, one at a time.
    pub async fn classify_batch(&self, records: &mut [ComplaintRecord]) -> BatchReport {
        self.classifier.classify_batch(records).await
    }

    pub async fn list_models(&self) -> InferenceResult<Vec<ModelInfo>> {
        self.classifier.backend().list_models().await
    }

    pub fn progress(&self, records: &[ComplaintRecord]) -> ClassificationProgress {
        ClassificationProgress::of(records)
    }

    /// Drops the cached embedding of `id` so the next request recomputes it.
    pub fn invalidate(&self, id: &str) -> bool {
        self.cache.invalidate(id)
    }

    /// Whether `record`'s current text differs from the text its cached embedding came from.
    pub fn is_stale(&self, record: &ComplaintRecord) -> Option<bool> {
        self.cache.is_stale(&record.id, &record.candidate_text())
    }

    /// Invalidates every record in `records` whose cached embedding is stale. Returns the ids
    /// that were dropped.
    pub fn refresh_stale(&self, records: &[ComplaintRecord]) -> Vec<String> {
        records
            .iter()
            .filter(|record| self.is_stale(record) == Some(true))
            .filter(|record| self.cache.invalidate(&record.id))
            .map(|record| record.id.clone())
            .collect()
    }

    /// Stops the snapshot worker and writes the final snapshot. Later calls only save.
    pub async fn shutdown(&self) -> CacheResult<usize> {
        let worker = self.worker.lock().take();
        match worker {
            Some(worker) => worker.shutdown().await,
            None => {
                warn!("Snapshot worker already stopped, saving directly");
                self.cache.save()
            }
        }
    }
}

