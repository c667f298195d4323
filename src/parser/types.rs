use serde::Serialize;

use super::error::ParseError;
use crate::record::ClassificationFields;

/// The five categorical fields plus the model's rationale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub fields: ClassificationFields,
    pub rationale: String,
}

/// How a [`ClassificationResult`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// The whole region parsed as one object.
    Single,
    /// Brace-span recovery folded `parsed` objects and skipped `skipped` spans.
    Folded { parsed: usize, skipped: usize },
}

/// Successful parser outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    pub result: ClassificationResult,
    pub provenance: Provenance,
}

impl ParsedReply {
    /// Returns `true` if the result came from folding.
    pub fn is_folded(&self) -> bool {
        matches!(self.provenance, Provenance::Folded { .. })
    }

    /// Returns [`ParseError::PartialRecovery`] when recovery skipped spans.
    pub fn warning(&self) -> Option<ParseError> {
        match self.provenance {
            Provenance::Folded { parsed, skipped } if skipped > 0 => {
                Some(ParseError::PartialRecovery { parsed, skipped })
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Single => write!(f, "SINGLE"),
            Provenance::Folded { parsed, skipped } => {
                write!(f, "FOLDED (parsed: {parsed}, skipped: {skipped})")
            }
        }
    }
}
