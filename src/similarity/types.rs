use serde::Serialize;

use crate::record::ComplaintRecord;

/// A ranked neighbour of the target complaint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityCandidate {
    pub id: String,
    /// Score in `[0, 1]`.
    pub score: f32,
    pub short_description: Option<String>,
    pub system_component: Option<String>,
    pub failure_mode: Option<String>,
    pub level2: Option<String>,
}

impl SimilarityCandidate {
    pub fn new(record: &ComplaintRecord, score: f32) -> Self {
        Self {
            id: record.id.clone(),
            score,
            short_description: record.short_description.clone(),
            system_component: record.classification.system_component.clone(),
            failure_mode: record.classification.failure_mode.clone(),
            level2: record.classification.level2.clone(),
        }
    }
}
