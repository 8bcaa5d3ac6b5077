//! Artifact naming and listing policy.
//!
//! `ArtifactStore` sits in front of an `ArtifactMedium` and owns the two
//! rules every medium shares:
//!
//! - **Naming**: `report-<sessionId>-<epochMillis>.<ext>`. Sequential calls
//!   at least 1 ms apart never collide; two calls for the same session within
//!   the same millisecond may, and the second persist then fails.
//! - **Ordering**: listings are newest first by the medium's `created_at`,
//!   ties broken by filename descending.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use clarion_contracts::{artifact::Artifact, error::ClarionResult};

use crate::traits::ArtifactMedium;

/// Leading component of every artifact filename.
pub const ARTIFACT_PREFIX: &str = "report";

/// Build the filename for a report on `session_id` generated at `now`.
///
/// Characters outside `[A-Za-z0-9_-]` in the session id are replaced with
/// `_`, so a session id can never address a path outside the medium.
pub fn name_artifact(session_id: &str, now: DateTime<Utc>, extension: &str) -> String {
    let safe_id: String = session_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "{}-{}-{}.{}",
        ARTIFACT_PREFIX,
        safe_id,
        now.timestamp_millis(),
        extension
    )
}

/// Newest first; equal timestamps fall back to filename, descending.
pub fn newest_first(a: &Artifact, b: &Artifact) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.filename.cmp(&a.filename))
}

/// Names, persists, and lists artifacts of one extension on one medium.
pub struct ArtifactStore {
    medium: Box<dyn ArtifactMedium>,
    extension: String,
}

impl ArtifactStore {
    pub fn new(medium: Box<dyn ArtifactMedium>, extension: impl Into<String>) -> Self {
        Self {
            medium,
            extension: extension.into(),
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn name_artifact(&self, session_id: &str, now: DateTime<Utc>) -> String {
        name_artifact(session_id, now, &self.extension)
    }

    /// Write `bytes` once under `filename`.
    ///
    /// # Errors
    ///
    /// `ArtifactPersistFailed` when the medium rejects the write, including
    /// when `filename` already exists.
    pub fn persist(&self, filename: &str, bytes: &[u8]) -> ClarionResult<Artifact> {
        debug!(filename = %filename, size = bytes.len(), "persisting artifact");
        self.medium.write(filename, bytes).inspect_err(|e| {
            warn!(filename = %filename, error = %e, "artifact persist failed");
        })
    }

    /// Every artifact with this store's extension, newest first.
    pub fn list(&self) -> ClarionResult<Vec<Artifact>> {
        let suffix = format!(".{}", self.extension);
        let mut artifacts: Vec<Artifact> = self
            .medium
            .list()?
            .into_iter()
            .filter(|a| a.filename.ends_with(&suffix))
            .collect();
        artifacts.sort_by(newest_first);
        Ok(artifacts)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
