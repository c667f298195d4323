use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::{debug, info};

use super::InferenceBackend;
use super::config::InferenceConfig;
use super::error::{InferenceError, InferenceResult};
use super::types::{GenerateRequest, GenerateResponse, ModelInfo, ModelList};

const GENERATE_PATH: &str = "api/generate";
const TAGS_PATH: &str = "api/tags";

/// Ollama HTTP client. One request per call, bounded by the configured timeout, no retries.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: HttpClient,
    config: InferenceConfig,
}

impl OllamaClient {
    pub fn new(config: InferenceConfig) -> InferenceResult<Self> {
        config.validate()?;

        let http = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| InferenceError::Transport {
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        info!(
            base_url = %config.base_url,
            model = %config.model,
            timeout_secs = config.timeout.as_secs(),
            "Inference client ready"
        );
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn request_error(&self, err: reqwest::Error) -> InferenceError {
        if err.is_timeout() {
            InferenceError::Timeout {
                secs: self.config.timeout.as_secs(),
            }
        } else if err.is_decode() {
            InferenceError::Decode {
                reason: err.to_string(),
            }
        } else {
            InferenceError::Transport {
                reason: err.to_string(),
            }
        }
    }

    async fn check_status(&self, resp: reqwest::Response) -> InferenceResult<reqwest::Response> {
        let status = resp.status();
        if status == reqwest::StatusCode::OK {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(InferenceError::Status {
            status: status.as_u16(),
            body: body.trim().to_string(),
        })
    }
}

#[async_trait]
impl InferenceBackend for OllamaClient {
    async fn generate(&self, prompt: &str) -> InferenceResult<String> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };

        debug!(model = %self.config.model, prompt_len = prompt.len(), "Sending generate request");

        let resp = self
            .http
            .post(self.url(GENERATE_PATH))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        let resp = self.check_status(resp).await?;

        let body: GenerateResponse = resp.json().await.map_err(|e| self.request_error(e))?;
        debug!(reply_len = body.response.len(), "Generate reply received");
        Ok(body.response)
    }

    async fn list_models(&self) -> InferenceResult<Vec<ModelInfo>> {
        let resp = self
            .http
            .get(self.url(TAGS_PATH))
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        let resp = self.check_status(resp).await?;

        let list: ModelList = resp.json().await.map_err(|e| self.request_error(e))?;
        Ok(list.models)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
