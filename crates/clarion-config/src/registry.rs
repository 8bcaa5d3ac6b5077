//! File-backed configuration registry.
//!
//! `FileConfigRegistry` loads a configuration document from TOML or JSON and
//! implements the `ConfigRegistry` trait from clarion-core.
//!
//! Loading pipeline:
//!
//! 1. Parse the text into a JSON value (TOML via `toml`, JSON via `serde_json`).
//! 2. Validate the value against the configuration JSON Schema.
//! 3. Deserialize into typed `ReportConfig`s.
//! 4. Run semantic checks the schema cannot express: unique section ids,
//!    `min <= max` on every range, and parseable path expressions.
//!
//! Any failure is a `ClarionError::ConfigError`; a registry that loaded is
//! safe to assemble reports against.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use clarion_contracts::{
    config::ReportConfig,
    error::{ClarionError, ClarionResult},
};
use clarion_core::traits::ConfigRegistry;
use clarion_query::PathExpression;

use crate::schema::validate_document;

/// A `ConfigRegistry` loaded from a TOML or JSON document.
///
/// Loading is strict where extraction is lenient. A field whose path does
/// not parse would only ever extract `null`, so one such field rejects the
/// whole document instead of producing reports with a silently empty row.
/// Paths that parse but address nothing are accepted; those resolve to
/// `null` per record.
///
/// ```rust,ignore
/// use clarion_config::FileConfigRegistry;
///
/// let registry = FileConfigRegistry::from_file(Path::new("configs/assessments.toml"))?;
/// ```
#[derive(Debug, Default)]
pub struct FileConfigRegistry {
    configs: BTreeMap<String, ReportConfig>,
}

impl FileConfigRegistry {
    /// Parse `s` as a TOML configuration document.
    pub fn from_toml_str(s: &str) -> ClarionResult<Self> {
        let document: Value = toml::from_str(s).map_err(|e| ClarionError::ConfigError {
            reason: format!("failed to parse configuration TOML: {}", e),
        })?;
        Self::from_value(document)
    }

    /// Parse `s` as a JSON configuration document.
    pub fn from_json_str(s: &str) -> ClarionResult<Self> {
        let document: Value = serde_json::from_str(s).map_err(|e| ClarionError::ConfigError {
            reason: format!("failed to parse configuration JSON: {}", e),
        })?;
        Self::from_value(document)
    }

    /// Read the file at `path`, choosing the parser from its extension
    /// (`.toml` or `.json`).
    pub fn from_file(path: &Path) -> ClarionResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ClarionError::ConfigError {
            reason: format!("failed to read configuration file '{}': {}", path.display(), e),
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&contents),
            Some("json") => Self::from_json_str(&contents),
            _ => Err(ClarionError::ConfigError {
                reason: format!(
                    "unsupported configuration file '{}': expected .toml or .json",
                    path.display()
                ),
            }),
        }
    }

    /// Validate and load an already-parsed configuration document.
    pub fn from_value(document: Value) -> ClarionResult<Self> {
        validate_document(&document)?;

        let configs: BTreeMap<String, ReportConfig> =
            serde_json::from_value(document).map_err(|e| ClarionError::ConfigError {
                reason: format!("configuration does not match the report config model: {}", e),
            })?;

        let problems: Vec<String> = configs
            .iter()
            .flat_map(|(id, config)| semantic_problems(id, config))
            .collect();
        if !problems.is_empty() {
            for problem in &problems {
                warn!(%problem, "configuration rejected");
            }
            return Err(ClarionError::ConfigError {
                reason: problems.join("; "),
            });
        }

        debug!(assessments = configs.len(), "configuration registry loaded");
        Ok(Self { configs })
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

impl ConfigRegistry for FileConfigRegistry {
    fn get(&self, assessment_id: &str) -> Option<&ReportConfig> {
        self.configs.get(assessment_id)
    }

    fn assessment_ids(&self) -> Vec<String> {
        self.configs.keys().cloned().collect()
    }
}

/// Problems in one config that the schema cannot catch.
fn semantic_problems(assessment_id: &str, config: &ReportConfig) -> Vec<String> {
    let mut problems = Vec::new();
    let mut seen = HashSet::new();

    for section in &config.sections {
        if !seen.insert(section.id.as_str()) {
            problems.push(format!(
                "assessment '{}': duplicate section id '{}'",
                assessment_id, section.id
            ));
        }

        for field in &section.fields {
            if let Err(e) = PathExpression::parse(&field.path) {
                problems.push(format!(
                    "assessment '{}', field '{}': {}",
                    assessment_id, field.label, e
                ));
            }

            let ranges = field.classification.iter().flat_map(|c| c.ranges.iter());
            for range in ranges {
                if let (Some(min), Some(max)) = (range.min, range.max) {
                    if min > max {
                        problems.push(format!(
                            "assessment '{}', field '{}': range '{}' has min {} greater than max {}",
                            assessment_id, field.label, range.label, min, max
                        ));
                    }
                }
            }
        }
    }

    problems
}
