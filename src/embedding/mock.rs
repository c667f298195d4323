//! Counting embedder and factories for tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{EmbedderFactory, EmbeddingError, SentenceEmbedder, TextEmbedder};

/// Stub embedder that counts `embed` calls and can simulate slow inference.
pub struct CountingEmbedder {
    inner: SentenceEmbedder,
    calls: AtomicUsize,
    delay: Duration,
}

impl CountingEmbedder {
    pub fn new() -> Result<Self, EmbeddingError> {
        Self::with_delay(Duration::ZERO)
    }

    pub fn with_delay(delay: Duration) -> Result<Self, EmbeddingError> {
        Ok(Self {
            inner: SentenceEmbedder::stub()?,
            calls: AtomicUsize::new(0),
            delay,
        })
    }

    /// Number of `embed` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextEmbedder for CountingEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        self.inner.embed(text)
    }

    fn embedding_dim(&self) -> usize {
        self.inner.embedding_dim()
    }
}

/// Factory that hands out one shared [`CountingEmbedder`] and counts builds.
#[derive(Clone)]
pub struct CountingFactory {
    embedder: Arc<CountingEmbedder>,
    builds: Arc<AtomicUsize>,
    build_delay: Duration,
}

impl CountingFactory {
    pub fn new() -> Result<Self, EmbeddingError> {
        Ok(Self {
            embedder: Arc::new(CountingEmbedder::new()?),
            builds: Arc::new(AtomicUsize::new(0)),
            build_delay: Duration::ZERO,
        })
    }

    /// Slows down both model construction and each inference call.
    pub fn with_delay(delay: Duration) -> Result<Self, EmbeddingError> {
        Ok(Self {
            embedder: Arc::new(CountingEmbedder::with_delay(delay)?),
            builds: Arc::new(AtomicUsize::new(0)),
            build_delay: delay,
        })
    }

    /// Number of model constructions so far.
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    /// Number of inference calls so far.
    pub fn inference_calls(&self) -> usize {
        self.embedder.calls()
    }
}

impl EmbedderFactory for CountingFactory {
    fn build(&self) -> Result<Arc<dyn TextEmbedder>, EmbeddingError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        if !self.build_delay.is_zero() {
            std::thread::sleep(self.build_delay);
        }
        Ok(self.embedder.clone())
    }
}

/// Factory whose builds always fail.
#[derive(Clone, Default)]
pub struct FailingFactory {
    attempts: Arc<AtomicUsize>,
}

impl FailingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl EmbedderFactory for FailingFactory {
    fn build(&self) -> Result<Arc<dyn TextEmbedder>, EmbeddingError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(EmbeddingError::ModelLoadFailed {
            reason: "model files unavailable".to_string(),
        })
    }
}
