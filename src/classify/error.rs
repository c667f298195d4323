use thiserror::Error;

use crate::inference::InferenceError;
use crate::parser::ParseError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClassificationError {
    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("reply could not be parsed: {0}")]
    Parse(#[from] ParseError),
}

pub type ClassifyResult<T> = Result<T, ClassificationError>;
