use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No `{` after the reasoning span, or no span parsed as an object.
    #[error("no structured content found in model reply")]
    NoStructuredContent,

    /// Some brace spans were skipped but at least one parsed. Reported as a warning next to a
    /// folded result, never returned as the error of [`parse`](super::parse).
    #[error("recovered {parsed} classification object(s), skipped {skipped} unparsable span(s)")]
    PartialRecovery { parsed: usize, skipped: usize },
}

pub type ParseResult<T> = Result<T, ParseError>;
