//! In-memory implementation of `ArtifactMedium`.
//!
//! `InMemoryArtifactMedium` keeps artifact bytes in a map protected by a
//! `Mutex`. Clones share the same storage, so a test can hand one clone to a
//! `ReportPipeline` and read rendered bytes back through another.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tracing::debug;

use clarion_contracts::{
    artifact::Artifact,
    error::{ClarionError, ClarionResult},
};
use clarion_core::traits::ArtifactMedium;

use crate::fs::check_filename;

// ── Internal state ────────────────────────────────────────────────────────────

pub(crate) struct StoredArtifact {
    pub(crate) bytes: Vec<u8>,
    pub(crate) created_at: DateTime<Utc>,
}

// ── Public medium ─────────────────────────────────────────────────────────────

/// A create-only artifact medium that never touches the filesystem.
///
/// `created_at` is the wall-clock time of the write.
#[derive(Clone, Default)]
pub struct InMemoryArtifactMedium {
    state: Arc<Mutex<BTreeMap<String, StoredArtifact>>>,
}

impl InMemoryArtifactMedium {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bytes stored under `filename`, if any.
    pub fn read(&self, filename: &str) -> Option<Vec<u8>> {
        self.lock().ok()?.get(filename).map(|a| a.bytes.clone())
    }

    pub fn len(&self) -> usize {
        self.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> ClarionResult<MutexGuard<'_, BTreeMap<String, StoredArtifact>>> {
        self.state.lock().map_err(|e| ClarionError::ArtifactPersistFailed {
            reason: format!("artifact store lock poisoned: {}", e),
        })
    }
}

impl ArtifactMedium for InMemoryArtifactMedium {
    fn write(&self, filename: &str, bytes: &[u8]) -> ClarionResult<Artifact> {
        check_filename(filename)?;
        let mut state = self.lock()?;
        if state.contains_key(filename) {
            return Err(ClarionError::ArtifactPersistFailed {
                reason: format!("artifact '{}' already exists", filename),
            });
        }

        let created_at = Utc::now();
        state.insert(
            filename.to_string(),
            StoredArtifact {
                bytes: bytes.to_vec(),
                created_at,
            },
        );
        debug!(filename = %filename, size = bytes.len(), "artifact stored in memory");

        Ok(Artifact {
            filename: filename.to_string(),
            path: PathBuf::from(filename),
            created_at,
        })
    }

    fn list(&self) -> ClarionResult<Vec<Artifact>> {
        let state = self.state.lock().map_err(|e| ClarionError::ArtifactListFailed {
            reason: format!("artifact store lock poisoned: {}", e),
        })?;
        Ok(state
            .iter()
            .map(|(filename, stored)| Artifact {
                filename: filename.clone(),
                path: PathBuf::from(filename),
                created_at: stored.created_at,
            })
            .collect())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
