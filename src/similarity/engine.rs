use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{debug, warn};

use super::capability::SimilarityCapability;
use super::error::{SimilarityError, SimilarityResult};
use super::types::SimilarityCandidate;
use crate::cache::EmbeddingCache;
use crate::constants::SIMILARITY_CUTOFF;
use crate::record::ComplaintRecord;
use crate::scoring::{ScoringMetadata, SimilarityScorer};

/// Drops candidates below the cutoff, sorts by descending score (ties keep input order) and
/// keeps at most `limit`.
pub fn rank_candidates(
    mut candidates: Vec<SimilarityCandidate>,
    limit: usize,
) -> Vec<SimilarityCandidate> {
    candidates.retain(|c| c.score >= SIMILARITY_CUTOFF);
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    candidates.truncate(limit);
    candidates
}

/// Finds complaints similar to a target within a corpus.
#[derive(Debug)]
pub struct SimilarityEngine {
    cache: Arc<EmbeddingCache>,
    scorer: SimilarityScorer,
    capability: SimilarityCapability,
}

impl SimilarityEngine {
    pub fn new(
        cache: Arc<EmbeddingCache>,
        scorer: SimilarityScorer,
        capability: SimilarityCapability,
    ) -> Self {
        Self {
            cache,
            scorer,
            capability,
        }
    }

    pub fn capability(&self) -> &SimilarityCapability {
        &self.capability
    }

    pub fn cache(&self) -> &Arc<EmbeddingCache> {
        &self.cache
    }

    /// Ranks every other record in `corpus` against `target_id`.
    ///
    /// An unknown target yields an empty result. A candidate whose embedding fails is skipped;
    /// a failure on the target, or an unavailable model, fails the whole call.
    pub fn find_similar(
        &self,
        target_id: &str,
        corpus: &[ComplaintRecord],
        limit: usize,
    ) -> SimilarityResult<Vec<SimilarityCandidate>> {
        self.capability.ensure()?;

        let Some(target) = corpus.iter().find(|r| r.id == target_id) else {
            debug!(target_id, "Similarity target not in corpus");
            return Ok(Vec::new());
        };

        let target_vector = self
            .cache
            .get_or_compute(&target.id, &target.candidate_text())?;
        let target_metadata = ScoringMetadata::from(&target.classification);

        let mut candidates = Vec::with_capacity(corpus.len().saturating_sub(1));
        for record in corpus.iter().filter(|r| r.id != target.id) {
            let vector = match self
                .cache
                .get_or_compute(&record.id, &record.candidate_text())
                .map_err(SimilarityError::from)
            {
                Ok(vector) => vector,
                Err(e @ SimilarityError::FeatureUnavailable { .. }) => return Err(e),
                Err(e) => {
                    warn!(id = %record.id, error = %e, "Skipping candidate without embedding");
                    continue;
                }
            };

            let score = self.scorer.score(
                &target_vector,
                &target_metadata,
                &vector,
                &ScoringMetadata::from(&record.classification),
            );
            candidates.push(SimilarityCandidate::new(record, score));
        }

        let scored = candidates.len();
        let ranked = rank_candidates(candidates, limit);
        debug!(
            target_id,
            scored,
            returned = ranked.len(),
            "Similarity search complete"
        );
        Ok(ranked)
    }
}
