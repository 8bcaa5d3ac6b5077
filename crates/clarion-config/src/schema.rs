//! Structural validation of configuration documents.
//!
//! A configuration document is a JSON object mapping assessment ids to
//! report configs. Before typed deserialization, the document is checked
//! against [`config_document_schema`] with the `jsonschema` crate so that
//! every structural problem is reported at once, with its location.

use serde_json::{json, Value};
use tracing::warn;

use clarion_contracts::error::{ClarionError, ClarionResult};

/// JSON Schema for a whole configuration document.
pub fn config_document_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": report_config_schema()
    })
}

fn report_config_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name", "sections"],
        "properties": {
            "name": { "type": "string" },
            "sections": { "type": "array", "items": section_schema() }
        }
    })
}

fn section_schema() -> Value {
    json!({
        "type": "object",
        "required": ["id", "title"],
        "properties": {
            "id": { "type": "string", "minLength": 1 },
            "title": { "type": "string" },
            "enabled": { "type": "boolean" },
            "fields": { "type": "array", "items": field_schema() }
        }
    })
}

fn field_schema() -> Value {
    json!({
        "type": "object",
        "required": ["label"],
        "anyOf": [
            { "required": ["path"] },
            { "required": ["jsonPath"] }
        ],
        "properties": {
            "label": { "type": "string" },
            "path": { "type": "string" },
            "jsonPath": { "type": "string" },
            "format": { "type": "string" },
            "unit": { "type": "string" },
            "classification": {
                "type": "object",
                "required": ["ranges"],
                "properties": {
                    "ranges": { "type": "array", "items": range_schema() }
                }
            }
        }
    })
}

fn range_schema() -> Value {
    json!({
        "type": "object",
        "required": ["label", "color"],
        "properties": {
            "min": { "type": "number" },
            "max": { "type": "number" },
            "label": { "type": "string" },
            "color": { "type": "string" }
        }
    })
}

/// Validate `document` against the configuration schema.
///
/// Returns `ConfigError` listing every violation, separated by `"; "`.
pub fn validate_document(document: &Value) -> ClarionResult<()> {
    let schema = config_document_schema();
    let validator = jsonschema::validator_for(&schema).map_err(|e| ClarionError::ConfigError {
        reason: format!("invalid configuration schema: {e}"),
    })?;

    let violations: Vec<String> = validator
        .iter_errors(document)
        .map(|error| {
            let message = format!("schema violation at '{}': {}", error.instance_path, error);
            warn!(%message, "configuration rejected");
            message
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ClarionError::ConfigError {
            reason: violations.join("; "),
        })
    }
}
