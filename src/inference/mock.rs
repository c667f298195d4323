use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::InferenceBackend;
use super::error::{InferenceError, InferenceResult};
use super::types::ModelInfo;

/// Scripted inference backend for tests.
///
/// Replies are returned in the order they were queued. An exhausted script answers with a
/// transport error.
#[derive(Debug, Default)]
pub struct MockInferenceBackend {
    script: Mutex<VecDeque<InferenceResult<String>>>,
    prompts: Mutex<Vec<String>>,
    models: Vec<ModelInfo>,
}

impl MockInferenceBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply.
    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.script.lock().push_back(Ok(reply.into()));
        self
    }

    /// Queues a failure.
    pub fn with_error(self, error: InferenceError) -> Self {
        self.script.lock().push_back(Err(error));
        self
    }

    /// Sets the models returned by `list_models`.
    pub fn with_models(mut self, models: Vec<ModelInfo>) -> Self {
        self.models = models;
        self
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        self.script.lock().push_back(Ok(reply.into()));
    }

    /// Number of generate calls so far.
    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl InferenceBackend for MockInferenceBackend {
    async fn generate(&self, prompt: &str) -> InferenceResult<String> {
        self.prompts.lock().push(prompt.to_string());
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| {
                Err(InferenceError::Transport {
                    reason: "mock script exhausted".to_string(),
                })
            })
    }

    async fn list_models(&self) -> InferenceResult<Vec<ModelInfo>> {
        Ok(self.models.clone())
    }

    fn model(&self) -> &str {
        "mock"
    }
}
