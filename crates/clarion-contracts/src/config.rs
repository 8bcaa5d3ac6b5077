//! Declarative report configuration types.
//!
//! A `ReportConfig` describes which fields of an assessment record appear in
//! a report, grouped into sections. Configurations are supplied externally
//! (TOML or JSON files) and are never generated or mutated by the pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// A complete report layout for one assessment type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Human-readable assessment name printed in the report header.
    pub name: String,
    /// Sections in presentation order.
    pub sections: Vec<Section>,
}

impl ReportConfig {
    /// Total number of field specs across all sections, enabled or not.
    pub fn total_fields(&self) -> usize {
        self.sections.iter().map(|s| s.fields.len()).sum()
    }
}

/// A titled group of fields. Disabled sections are skipped entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

fn default_enabled() -> bool {
    true
}

/// One labelled value to extract from the assessment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub label: String,
    /// Path expression, e.g. `$.vitalsMap.vitals.heart_rate`.
    ///
    /// Existing configuration files spell this key `jsonPath`.
    #[serde(alias = "jsonPath")]
    pub path: String,
    #[serde(default)]
    pub format: FormatKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<ClassificationSpec>,
}

/// How a raw value is turned into display text at render time.
///
/// Unknown names deserialize as `Text` so a typo in a config degrades to
/// pass-through rendering instead of rejecting the whole file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    /// One decimal place.
    Percentage,
    /// Two decimal places.
    Decimal,
    /// Rounded to the nearest integer.
    Number,
    /// Rounded to the nearest whole second.
    Time,
    /// Passed through unchanged.
    #[default]
    #[serde(rename = "string")]
    Text,
}

impl FormatKind {
    pub const ALL: [FormatKind; 5] = [
        FormatKind::Percentage,
        FormatKind::Decimal,
        FormatKind::Number,
        FormatKind::Time,
        FormatKind::Text,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatKind::Percentage => "percentage",
            FormatKind::Decimal => "decimal",
            FormatKind::Number => "number",
            FormatKind::Time => "time",
            FormatKind::Text => "string",
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "percentage" => FormatKind::Percentage,
            "decimal" => FormatKind::Decimal,
            "number" => FormatKind::Number,
            "time" => FormatKind::Time,
            _ => FormatKind::Text,
        })
    }
}

impl<'de> Deserialize<'de> for FormatKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(name.parse().unwrap_or_default())
    }
}

/// Ordered numeric buckets used to label a value (e.g. "Low" / "Normal").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationSpec {
    pub ranges: Vec<Range>,
}

/// An inclusive interval `[min, max]`. A missing bound is unbounded.
///
/// Ranges may overlap; the classifier picks the first match in declaration
/// order, so a value on a shared boundary belongs to the earlier range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Range {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub label: String,
    pub color: String,
}

impl Range {
    pub fn contains(&self, value: f64) -> bool {
        let lower = self.min.unwrap_or(f64::NEG_INFINITY);
        let upper = self.max.unwrap_or(f64::INFINITY);
        lower <= value && value <= upper
    }
}
