use crate::constants::{
    EMBEDDING_WEIGHT, FAILURE_MODE_BONUS, LEVEL2_BONUS, METADATA_WEIGHT, SYSTEM_COMPONENT_BONUS,
};
use crate::record::ClassificationFields;

/// Categorical fields compared by the scorer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoringMetadata<'a> {
    pub system_component: Option<&'a str>,
    pub failure_mode: Option<&'a str>,
    pub level2: Option<&'a str>,
}

impl<'a> From<&'a ClassificationFields> for ScoringMetadata<'a> {
    fn from(fields: &'a ClassificationFields) -> Self {
        Self {
            system_component: fields.system_component.as_deref(),
            failure_mode: fields.failure_mode.as_deref(),
            level2: fields.level2.as_deref(),
        }
    }
}

/// Weights applied by [`SimilarityScorer`](super::SimilarityScorer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub embedding: f32,
    pub metadata: f32,
    pub system_component: f32,
    pub failure_mode: f32,
    pub level2: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            embedding: EMBEDDING_WEIGHT,
            metadata: METADATA_WEIGHT,
            system_component: SYSTEM_COMPONENT_BONUS,
            failure_mode: FAILURE_MODE_BONUS,
            level2: LEVEL2_BONUS,
        }
    }
}

/// Components of one score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    /// `1 - cosine_distance` of the two embeddings.
    pub embedding_similarity: f32,
    /// Sum of the bonuses for agreeing fields.
    pub metadata_bonus: f32,
    /// Final score in `[0, 1]`.
    pub score: f32,
}
