//! Complaint records as the core sees them.
//!
//! The storage layer owns the full schema; the core only reads the text fields and writes the
//! classification fields, rationale and update timestamp.

pub mod taxonomy;


use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::SOURCE_NOTES_CHAR_LIMIT;
use crate::parser::ClassificationResult;

/// `system_component` values that mark a record as not yet classified.
pub const UNCLASSIFIED_MARKERS: [&str; 4] = ["Unclassified", "Uncategorized", "未分类", "N/A"];

/// The five categorical fields. `None` is the unset sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationFields {
    pub system_component: Option<String>,
    pub failure_mode: Option<String>,
    pub severity: Option<String>,
    pub priority: Option<String>,
    pub level2: Option<String>,
}

/// A complaint record handed over by the storage layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplaintRecord {
    /// Unique, stable identifier (the PR id).
    pub id: String,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub source_customer_description: Option<String>,
    #[serde(default)]
    pub source_notes: Option<String>,
    #[serde(flatten)]
    pub classification: ClassificationFields,
    #[serde(default)]
    pub rationale: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ComplaintRecord {
    /// Creates a record with only an identifier set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Text used for embedding: the free-text fields joined by spaces, with `source_notes`
    /// cut to its first [`SOURCE_NOTES_CHAR_LIMIT`] characters.
    pub fn candidate_text(&self) -> String {
        let notes: String = self
            .source_notes
            .as_deref()
            .unwrap_or_default()
            .chars()
            .take(SOURCE_NOTES_CHAR_LIMIT)
            .collect();

        [
            self.short_description.as_deref().unwrap_or_default(),
            self.description.as_deref().unwrap_or_default(),
            self.source_customer_description
                .as_deref()
                .unwrap_or_default(),
            notes.as_str(),
        ]
        .join(" ")
    }

    /// Returns `true` if `system_component` is unset or one of [`UNCLASSIFIED_MARKERS`].
    pub fn is_unclassified(&self) -> bool {
        match self.classification.system_component.as_deref() {
            None => true,
            Some(value) => UNCLASSIFIED_MARKERS.contains(&value),
        }
    }

    /// Writes a parsed classification onto the record and touches `updated_at`.
    pub fn apply_classification(&mut self, result: &ClassificationResult) {
        self.classification = result.fields.clone();
        self.rationale = Some(result.rationale.clone());
        self.updated_at = Some(Utc::now());
    }
}

/// Classification progress over a set of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassificationProgress {
    /// Records with a `system_component` set.
    pub completed: usize,
    /// All records.
    pub total: usize,
}

impl ClassificationProgress {
    /// Counts progress over `records`.
    pub fn of(records: &[ComplaintRecord]) -> Self {
        let completed = records
            .iter()
            .filter(|r| r.classification.system_component.is_some())
            .count();
        Self {
            completed,
            total: records.len(),
        }
    }
}
