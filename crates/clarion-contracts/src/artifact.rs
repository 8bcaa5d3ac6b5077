//! Persisted report artifacts.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A rendered report stored in an artifact medium.
///
/// Artifacts are append-only: the pipeline never rewrites or deletes one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// `report-<sessionId>-<epochMillis>.<ext>`
    pub filename: String,
    /// Where the medium stored the bytes.
    pub path: PathBuf,
    /// Creation time as recorded by the medium, not parsed from the name.
    pub created_at: DateTime<Utc>,
}
