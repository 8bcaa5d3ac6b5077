//! Filesystem medium with a metadata manifest.
//!
//! `ManifestArtifactMedium` stores artifacts exactly like
//! [`FsArtifactMedium`] and additionally keeps `report-metadata.json` in the
//! same directory: one entry per artifact with its generation time and a
//! SHA-256 digest of its bytes. Listings come from the manifest rather than
//! from filesystem metadata, so creation times survive copies and restores,
//! and [`ManifestArtifactMedium::verify`] can detect a modified artifact.
//!
//! Manifest shape:
//!
//! ```json
//! [
//!   {
//!     "filename": "report-session_001-1736942400123.html",
//!     "generated_at": "2025-01-15T12:00:00.123Z",
//!     "sha256": "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
//!   }
//! ]
//! ```

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use clarion_contracts::{
    artifact::Artifact,
    error::{ClarionError, ClarionResult},
};
use clarion_core::traits::ArtifactMedium;

use crate::fs::FsArtifactMedium;

/// Name of the manifest file inside the artifact directory.
pub const MANIFEST_FILENAME: &str = "report-metadata.json";

/// One manifest record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub filename: String,
    pub generated_at: DateTime<Utc>,
    /// Lowercase hex SHA-256 of the artifact bytes.
    pub sha256: String,
}

/// Lowercase 64-character hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// An `ArtifactMedium` that records every write in a JSON manifest.
pub struct ManifestArtifactMedium {
    files: FsArtifactMedium,
    // Serializes manifest read-modify-write cycles within this process.
    manifest_lock: Mutex<()>,
}

impl ManifestArtifactMedium {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            files: FsArtifactMedium::new(root),
            manifest_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        self.files.root()
    }

    fn manifest_path(&self) -> PathBuf {
        self.files.root().join(MANIFEST_FILENAME)
    }

    /// All manifest entries in write order. A missing manifest is empty.
    pub fn entries(&self) -> ClarionResult<Vec<ManifestEntry>> {
        let path = self.manifest_path();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ClarionError::ArtifactListFailed {
                    reason: format!("failed to read manifest '{}': {}", path.display(), e),
                })
            }
        };
        serde_json::from_str(&contents).map_err(|e| ClarionError::ArtifactListFailed {
            reason: format!("malformed manifest '{}': {}", path.display(), e),
        })
    }

    /// Recompute the digest of `filename` and compare it with the manifest.
    ///
    /// Returns `Ok(false)` when the bytes no longer match. An artifact the
    /// manifest does not know, or one that cannot be read, is an error.
    pub fn verify(&self, filename: &str) -> ClarionResult<bool> {
        let entry = self
            .entries()?
            .into_iter()
            .find(|e| e.filename == filename)
            .ok_or_else(|| ClarionError::ArtifactListFailed {
                reason: format!("artifact '{}' is not in the manifest", filename),
            })?;

        let bytes = fs::read(self.files.root().join(filename)).map_err(|e| {
            ClarionError::ArtifactListFailed {
                reason: format!("failed to read artifact '{}': {}", filename, e),
            }
        })?;

        let intact = sha256_hex(&bytes) == entry.sha256;
        if !intact {
            warn!(filename = %filename, "artifact digest does not match manifest");
        }
        Ok(intact)
    }

    /// Replace the manifest atomically: write a hidden temp file, then rename.
    fn store_entries(&self, entries: &[ManifestEntry]) -> ClarionResult<()> {
        let path = self.manifest_path();
        let temp = self
            .files
            .root()
            .join(format!(".{}.partial", MANIFEST_FILENAME));

        let json = serde_json::to_vec_pretty(entries).map_err(|e| manifest_failed(&path, e))?;
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp)
            .map_err(|e| manifest_failed(&path, e))?;
        file.write_all(&json)
            .and_then(|_| file.sync_all())
            .map_err(|e| manifest_failed(&path, e))?;
        fs::rename(&temp, &path).map_err(|e| manifest_failed(&path, e))
    }
}

impl ArtifactMedium for ManifestArtifactMedium {
    fn write(&self, filename: &str, bytes: &[u8]) -> ClarionResult<Artifact> {
        if filename == MANIFEST_FILENAME {
            return Err(ClarionError::ArtifactPersistFailed {
                reason: format!("'{}' is reserved for the manifest", MANIFEST_FILENAME),
            });
        }

        let _guard = self
            .manifest_lock
            .lock()
            .map_err(|e| ClarionError::ArtifactPersistFailed {
                reason: format!("manifest lock poisoned: {}", e),
            })?;

        // An unreadable manifest must fail the write before any file appears.
        let mut entries = self.entries().map_err(|e| ClarionError::ArtifactPersistFailed {
            reason: e.to_string(),
        })?;

        let path = self.files.publish(filename, bytes)?;
        let entry = ManifestEntry {
            filename: filename.to_string(),
            generated_at: Utc::now(),
            sha256: sha256_hex(bytes),
        };
        entries.push(entry.clone());

        if let Err(e) = self.store_entries(&entries) {
            if let Err(unlink) = fs::remove_file(&path) {
                warn!(path = %path.display(), error = %unlink, "failed to remove unrecorded artifact");
            }
            return Err(e);
        }

        debug!(filename = %filename, sha256 = %entry.sha256, "manifest updated");
        Ok(Artifact {
            filename: entry.filename,
            path,
            created_at: entry.generated_at,
        })
    }

    fn list(&self) -> ClarionResult<Vec<Artifact>> {
        let root = self.files.root();
        Ok(self
            .entries()?
            .into_iter()
            .map(|entry| Artifact {
                path: root.join(&entry.filename),
                filename: entry.filename,
                created_at: entry.generated_at,
            })
            .collect())
    }
}

fn manifest_failed(path: &Path, e: impl std::fmt::Display) -> ClarionError {
    ClarionError::ArtifactPersistFailed {
        reason: format!("failed to update manifest '{}': {}", path.display(), e),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
