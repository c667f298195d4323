use std::env;
use std::time::Duration;

use super::error::{InferenceError, InferenceResult};
use crate::constants::DEFAULT_INFERENCE_TIMEOUT_SECS;

/// Default inference server.
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
/// Default model used for classification.
pub const DEFAULT_OLLAMA_MODEL: &str = "deepseek-r1:14b";

/// Settings for [`OllamaClient`](super::OllamaClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceConfig {
    /// Server base URL, without a trailing path.
    pub base_url: String,
    /// Model name sent with every generate request.
    pub model: String,
    /// Upper bound on one request, connect to last byte.
    pub timeout: Duration,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_OLLAMA_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_INFERENCE_TIMEOUT_SECS),
        }
    }
}

impl InferenceConfig {
    /// Env var overriding the server URL.
    pub const ENV_URL: &'static str = "TRIAGE_OLLAMA_URL";
    /// Env var overriding the model name.
    pub const ENV_MODEL: &'static str = "TRIAGE_OLLAMA_MODEL";
    /// Env var overriding the timeout, in whole seconds.
    pub const ENV_TIMEOUT_SECS: &'static str = "TRIAGE_INFERENCE_TIMEOUT_SECS";

    /// Loads `TRIAGE_OLLAMA_*` overrides on top of defaults.
    pub fn from_env() -> InferenceResult<Self> {
        let mut config = Self::default();

        if let Ok(url) = env::var(Self::ENV_URL) {
            let url = url.trim();
            if !url.is_empty() {
                config.base_url = url.trim_end_matches('/').to_string();
            }
        }

        if let Ok(model) = env::var(Self::ENV_MODEL) {
            let model = model.trim();
            if !model.is_empty() {
                config.model = model.to_string();
            }
        }

        if let Ok(secs) = env::var(Self::ENV_TIMEOUT_SECS) {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| InferenceError::InvalidConfig {
                    reason: format!(
                        "{} must be a whole number of seconds, got {:?}",
                        Self::ENV_TIMEOUT_SECS,
                        secs
                    ),
                })?;
            config.timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Config pointing at `base_url` with default model and timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> InferenceResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(InferenceError::InvalidConfig {
                reason: format!("base_url must be http(s), got {:?}", self.base_url),
            });
        }
        if self.model.trim().is_empty() {
            return Err(InferenceError::InvalidConfig {
                reason: "model must not be empty".to_string(),
            });
        }
        if self.timeout.is_zero() {
            return Err(InferenceError::InvalidConfig {
                reason: "timeout must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}
