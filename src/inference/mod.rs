//! Language-model inference boundary.
//!
//! [`OllamaClient`] talks to an Ollama-compatible server (`/api/generate`, `/api/tags`).
//! Use `MockInferenceBackend` (behind the `mock` feature) in tests.

pub mod client;
pub mod config;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod types;


pub use client::OllamaClient;
pub use config::{DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL, InferenceConfig};
pub use error::{InferenceError, InferenceResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockInferenceBackend;
pub use types::{GenerateRequest, GenerateResponse, ModelInfo, ModelList};

use async_trait::async_trait;

#[async_trait]
/// Text generation and model listing.
pub trait InferenceBackend: Send + Sync {
    /// Sends `prompt` and returns the model's full reply.
    async fn generate(&self, prompt: &str) -> InferenceResult<String>;
    /// Lists models installed on the server.
    async fn list_models(&self) -> InferenceResult<Vec<ModelInfo>>;
    /// Model name used for generation.
    fn model(&self) -> &str;
}
