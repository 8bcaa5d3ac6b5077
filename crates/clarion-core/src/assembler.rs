//! Report assembly: record + config → `ReportDocument`.
//!
//! Assembly only extracts. Each field keeps its raw value alongside the
//! format, unit, and classification metadata from the config; the renderer
//! formats and classifies later. A record with missing or mis-shaped data
//! still yields every enabled section and every field, with `null` values
//! where paths did not resolve.

use chrono::{DateTime, Utc};
use tracing::debug;

use clarion_contracts::{
    config::{FieldSpec, ReportConfig, Section},
    record::AssessmentRecord,
    report::{ExtractedField, ReportDocument, ReportSection},
};
use clarion_query::extract;

/// Assemble the report model for `record` using `config`.
///
/// Disabled sections are skipped; everything else keeps config declaration
/// order. Never fails: malformed configs are rejected when they are loaded.
pub fn assemble(
    record: &AssessmentRecord,
    config: &ReportConfig,
    generated_at: DateTime<Utc>,
) -> ReportDocument {
    let session_id = record.session_id().unwrap_or_default().to_string();

    let sections: Vec<ReportSection> = config
        .sections
        .iter()
        .filter(|section| {
            if !section.enabled {
                debug!(section_id = %section.id, "skipping disabled section");
            }
            section.enabled
        })
        .map(|section| assemble_section(record, section))
        .collect();

    let document = ReportDocument {
        assessment_name: config.name.clone(),
        session_id,
        generated_at,
        sections,
    };

    debug!(
        session_id = %document.session_id,
        sections = document.sections.len(),
        fields = document.field_count(),
        unresolved = document.unresolved_count(),
        "report assembled"
    );

    document
}

fn assemble_section(record: &AssessmentRecord, section: &Section) -> ReportSection {
    ReportSection {
        id: section.id.clone(),
        title: section.title.clone(),
        fields: section
            .fields
            .iter()
            .map(|field| extract_field(record, field))
            .collect(),
    }
}

fn extract_field(record: &AssessmentRecord, spec: &FieldSpec) -> ExtractedField {
    ExtractedField {
        label: spec.label.clone(),
        value: extract(record.document(), &spec.path),
        format: spec.format,
        unit: spec.unit.clone(),
        classification: spec.classification.clone(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
