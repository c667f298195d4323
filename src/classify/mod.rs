//! LLM-backed classification of complaint records.
//!
//! [`Classifier::classify`] builds the prompt, calls the inference backend once and parses the
//! reply. The record is written only after a successful parse; on any failure it is left
//! exactly as it was.

pub mod error;
pub mod prompt;


pub use error::{ClassificationError, ClassifyResult};
pub use prompt::build_prompt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::inference::InferenceBackend;
use crate::parser::{self, ParsedReply};
use crate::record::ComplaintRecord;

/// Totals of one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Unclassified records visited.
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Successes where recovery skipped at least one span.
    pub partially_recovered: usize,
}

/// Classifies records through an [`InferenceBackend`].
#[derive(Debug)]
pub struct Classifier<B> {
    backend: B,
}

impl<B: InferenceBackend> Classifier<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Classifies one record and writes the result onto it.
    pub async fn classify(&self, record: &mut ComplaintRecord) -> ClassifyResult<ParsedReply> {
        let prompt = build_prompt(record);
        debug!(id = %record.id, model = self.backend.model(), "Classifying complaint");

        let reply = self.backend.generate(&prompt).await?;
        let parsed = parser::parse(&reply)?;

        if let Some(warning) = parsed.warning() {
            warn!(id = %record.id, %warning, "Classification partially recovered");
        }

        record.apply_classification(&parsed.result);
        debug!(
            id = %record.id,
            provenance = %parsed.provenance,
            system_component = ?record.classification.system_component,
            "Complaint classified"
        );
        Ok(parsed)
    }

    /// Classifies every unclassified record, one at a time. Failures are logged and counted;
    /// they never stop the batch.
    pub async fn classify_batch(&self, records: &mut [ComplaintRecord]) -> BatchReport {
        let mut report = BatchReport::default();

        for record in records.iter_mut().filter(|r| r.is_unclassified()) {
            report.attempted += 1;
            match self.classify(record).await {
                Ok(parsed) => {
                    report.succeeded += 1;
                    if parsed.warning().is_some() {
                        report.partially_recovered += 1;
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(id = %record.id, error = %e, "Classification failed, record left unchanged");
                }
            }
        }

        info!(
            attempted = report.attempted,
            succeeded = report.succeeded,
            failed = report.failed,
            partially_recovered = report.partially_recovered,
            "Batch classification finished"
        );
        report
    }
}
