use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn};

use super::{EmbedderFactory, EmbeddingError, TextEmbedder};

/// Shared embedder handle that builds the model on first use.
///
/// Construction happens under the slot lock, so concurrent first callers block until the one
/// building it finishes and then share the same instance. A failed build leaves the slot empty
/// and the next caller retries.
pub struct LazyEmbedder {
    factory: Box<dyn EmbedderFactory>,
    slot: Mutex<Option<Arc<dyn TextEmbedder>>>,
}

impl std::fmt::Debug for LazyEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyEmbedder")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl LazyEmbedder {
    pub fn new(factory: impl EmbedderFactory + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            slot: Mutex::new(None),
        }
    }

    /// Wraps an already-built embedder.
    pub fn ready(embedder: Arc<dyn TextEmbedder>) -> Self {
        struct Prebuilt(Arc<dyn TextEmbedder>);

        impl EmbedderFactory for Prebuilt {
            fn build(&self) -> Result<Arc<dyn TextEmbedder>, EmbeddingError> {
                Ok(Arc::clone(&self.0))
            }
        }

        Self {
            slot: Mutex::new(Some(Arc::clone(&embedder))),
            factory: Box::new(Prebuilt(embedder)),
        }
    }

    /// Returns the shared embedder, building it if needed.
    pub fn get(&self) -> Result<Arc<dyn TextEmbedder>, EmbeddingError> {
        let mut slot = self.slot.lock();
        if let Some(embedder) = slot.as_ref() {
            return Ok(Arc::clone(embedder));
        }

        info!("Initializing shared embedding model");
        match self.factory.build() {
            Ok(embedder) => {
                info!(
                    embedding_dim = embedder.embedding_dim(),
                    "Embedding model ready"
                );
                *slot = Some(Arc::clone(&embedder));
                Ok(embedder)
            }
            Err(e) => {
                warn!(error = %e, "Embedding model construction failed");
                Err(e)
            }
        }
    }

    /// Returns `true` once a build has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.slot.lock().is_some()
    }
}
