//! The assembled, renderer-agnostic report model.
//!
//! A `ReportDocument` carries raw extracted values together with the
//! formatting metadata from the config. Formatting and classification are
//! applied by the renderer, so the same document can be rendered in several
//! output formats without re-extracting anything.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{ClassificationSpec, FormatKind};

/// The fully assembled report. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub assessment_name: String,
    pub session_id: String,
    pub generated_at: DateTime<Utc>,
    /// Enabled sections only, in config declaration order.
    pub sections: Vec<ReportSection>,
}

impl ReportDocument {
    pub fn field_count(&self) -> usize {
        self.sections.iter().map(|s| s.fields.len()).sum()
    }

    /// Number of fields whose path resolved to nothing.
    pub fn unresolved_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| s.fields.iter())
            .filter(|f| f.value.is_null())
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub id: String,
    pub title: String,
    pub fields: Vec<ExtractedField>,
}

/// A single field as extracted from the record, not yet formatted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedField {
    pub label: String,
    /// Exactly what the path extractor returned; `Null` when unresolved.
    pub value: Value,
    pub format: FormatKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<ClassificationSpec>,
}

/// The bucket a value falls into, as produced by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    pub color: String,
}
