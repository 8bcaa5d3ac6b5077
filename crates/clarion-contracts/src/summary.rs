//! Lightweight listings for operator tooling.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row of the session listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub assessment_id: String,
    /// The config's name, or `"Unknown Assessment"` when none is registered.
    pub assessment_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
}

/// One row of the configuration listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub assessment_id: String,
    pub name: String,
    pub sections_count: usize,
    pub total_fields: usize,
}
