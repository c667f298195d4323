use super::types::{ScoreBreakdown, ScoreWeights, ScoringMetadata};

/// Cosine similarity of two vectors. Mismatched lengths, empty input or a zero norm give `0.0`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a_sq, norm_b_sq) = a
        .iter()
        .zip(b.iter())
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (&x, &y)| {
            (dot + x * y, na + x * x, nb + y * y)
        });

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

fn agrees(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => !a.is_empty() && a == b,
        _ => false,
    }
}

/// Blends embedding similarity with metadata agreement.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityScorer {
    weights: ScoreWeights,
}

impl SimilarityScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Final score in `[0, 1]`. Symmetric in its two (vector, metadata) pairs.
    #[inline]
    pub fn score(
        &self,
        target_vector: &[f32],
        target_metadata: &ScoringMetadata<'_>,
        other_vector: &[f32],
        other_metadata: &ScoringMetadata<'_>,
    ) -> f32 {
        self.breakdown(target_vector, target_metadata, other_vector, other_metadata)
            .score
    }

    /// Same as [`score`](Self::score) but also returns the two components.
    pub fn breakdown(
        &self,
        target_vector: &[f32],
        target_metadata: &ScoringMetadata<'_>,
        other_vector: &[f32],
        other_metadata: &ScoringMetadata<'_>,
    ) -> ScoreBreakdown {
        let w = &self.weights;
        let embedding_similarity = cosine_similarity(target_vector, other_vector);

        let mut metadata_bonus = 0.0;
        if agrees(
            target_metadata.system_component,
            other_metadata.system_component,
        ) {
            metadata_bonus += w.system_component;
        }
        if agrees(target_metadata.failure_mode, other_metadata.failure_mode) {
            metadata_bonus += w.failure_mode;
        }
        if agrees(target_metadata.level2, other_metadata.level2) {
            metadata_bonus += w.level2;
        }

        let score = (w.embedding * embedding_similarity + w.metadata * metadata_bonus).clamp(0.0, 1.0);

        ScoreBreakdown {
            embedding_similarity,
            metadata_bonus,
            score,
        }
    }
}
