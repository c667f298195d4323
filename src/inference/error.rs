use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InferenceError {
    #[error("inference request failed: {reason}")]
    Transport { reason: String },

    #[error("inference server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("inference request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("failed to decode inference response: {reason}")]
    Decode { reason: String },

    #[error("invalid inference configuration: {reason}")]
    InvalidConfig { reason: String },
}

pub type InferenceResult<T> = Result<T, InferenceError>;
