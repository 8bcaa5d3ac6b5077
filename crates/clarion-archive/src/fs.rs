//! Filesystem artifact medium.
//!
//! Artifacts live as plain files in one directory. Creation time comes from
//! filesystem metadata (birth time where the platform records it, otherwise
//! modification time), never from the filename.
//!
//! Writes are create-only and atomic: bytes go to a hidden `.partial` file
//! first and are then published under the final name with a hard link, which
//! fails if that name already exists. Listings skip hidden files, so a
//! concurrent `list()` never sees a half-written artifact.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use clarion_contracts::{
    artifact::Artifact,
    error::{ClarionError, ClarionResult},
};
use clarion_core::traits::ArtifactMedium;

/// Suffix of in-flight temporary files.
const PARTIAL_SUFFIX: &str = ".partial";

/// An `ArtifactMedium` backed by a directory.
///
/// The directory is created on first write; listing a directory that does
/// not exist yet returns an empty list.
#[derive(Debug, Clone)]
pub struct FsArtifactMedium {
    root: PathBuf,
}

impl FsArtifactMedium {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` and publish them as `filename`. Returns the final path.
    pub(crate) fn publish(&self, filename: &str, bytes: &[u8]) -> ClarionResult<PathBuf> {
        check_filename(filename)?;

        fs::create_dir_all(&self.root).map_err(|e| persist_failed(filename, "create directory", e))?;

        let final_path = self.root.join(filename);
        let temp_path = self.root.join(format!(".{}{}", filename, PARTIAL_SUFFIX));

        {
            let mut file = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&temp_path)
                .map_err(|e| persist_failed(filename, "create temporary file", e))?;
            let written = file.write_all(bytes).and_then(|_| file.sync_all());
            if let Err(e) = written {
                remove_temp(&temp_path);
                return Err(persist_failed(filename, "write temporary file", e));
            }
        }

        let linked = fs::hard_link(&temp_path, &final_path);
        remove_temp(&temp_path);
        linked.map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                ClarionError::ArtifactPersistFailed {
                    reason: format!("artifact '{}' already exists", filename),
                }
            } else {
                persist_failed(filename, "publish", e)
            }
        })?;

        debug!(path = %final_path.display(), size = bytes.len(), "artifact published");
        Ok(final_path)
    }
}

impl ArtifactMedium for FsArtifactMedium {
    fn write(&self, filename: &str, bytes: &[u8]) -> ClarionResult<Artifact> {
        let path = self.publish(filename, bytes)?;
        let metadata = fs::metadata(&path).map_err(|e| persist_failed(filename, "stat", e))?;
        Ok(Artifact {
            filename: filename.to_string(),
            created_at: created_at(&metadata),
            path,
        })
    }

    fn list(&self) -> ClarionResult<Vec<Artifact>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ClarionError::ArtifactListFailed {
                    reason: format!("failed to read '{}': {}", self.root.display(), e),
                })
            }
        };

        let mut artifacts = Vec::new();
        for entry in entries.flatten() {
            let filename = entry.file_name().to_string_lossy().into_owned();
            if filename.starts_with('.') {
                continue;
            }
            // The file may disappear between read_dir and stat; skip it.
            let metadata = match entry.metadata() {
                Ok(m) if m.is_file() => m,
                Ok(_) => continue,
                Err(e) => {
                    debug!(filename = %filename, error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            artifacts.push(Artifact {
                path: entry.path(),
                created_at: created_at(&metadata),
                filename,
            });
        }
        Ok(artifacts)
    }
}

/// Reject names that are empty, hidden, or not a single path component.
pub(crate) fn check_filename(filename: &str) -> ClarionResult<()> {
    let invalid = filename.is_empty()
        || filename.starts_with('.')
        || filename.contains('/')
        || filename.contains('\\');
    if invalid {
        return Err(ClarionError::ArtifactPersistFailed {
            reason: format!("invalid artifact filename '{}'", filename),
        });
    }
    Ok(())
}

fn created_at(metadata: &fs::Metadata) -> DateTime<Utc> {
    metadata
        .created()
        .or_else(|_| metadata.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now())
}

fn remove_temp(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!(path = %path.display(), error = %e, "failed to remove temporary artifact file");
    }
}

fn persist_failed(filename: &str, step: &str, e: std::io::Error) -> ClarionError {
    ClarionError::ArtifactPersistFailed {
        reason: format!("{} failed for '{}': {}", step, filename, e),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::fs;

    use clarion_contracts::error::ClarionError;
    use clarion_core::traits::ArtifactMedium;

    use super::FsArtifactMedium;

    #[test]
    fn nonexistent_directory_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let medium = FsArtifactMedium::new(dir.path().join("never-created"));
        assert!(medium.list().unwrap().is_empty());
    }

    #[test]
    fn write_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let medium = FsArtifactMedium::new(dir.path().join("reports"));

        let artifact = medium.write("report-s-1.pdf", b"%PDF-1.7").unwrap();

        assert_eq!(artifact.path, dir.path().join("reports").join("report-s-1.pdf"));
        assert_eq!(fs::read(&artifact.path).unwrap(), b"%PDF-1.7");
    }

    #[test]
    fn write_is_create_only() {
        let dir = tempfile::tempdir().unwrap();
        let medium = FsArtifactMedium::new(dir.path());
        medium.write("report-s-1.pdf", b"original").unwrap();

        let err = medium.write("report-s-1.pdf", b"replacement").unwrap_err();

        match err {
            ClarionError::ArtifactPersistFailed { reason } => {
                assert!(reason.contains("already exists"), "got: {reason}")
            }
            other => panic!("expected ArtifactPersistFailed, got {:?}", other),
        }
        assert_eq!(fs::read(dir.path().join("report-s-1.pdf")).unwrap(), b"original");
    }

    #[test]
    fn no_temporary_files_are_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let medium = FsArtifactMedium::new(dir.path());
        medium.write("report-s-1.pdf", b"a").unwrap();
        let _ = medium.write("report-s-1.pdf", b"b");

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["report-s-1.pdf".to_string()]);
    }

    #[test]
    fn list_skips_hidden_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".report-s-9.pdf.partial"), b"half").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        let medium = FsArtifactMedium::new(dir.path());
        medium.write("report-s-1.pdf", b"a").unwrap();

        let listed = medium.list().unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].filename, "report-s-1.pdf");
    }

    #[test]
    fn invalid_filenames_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let medium = FsArtifactMedium::new(dir.path());
        for name in ["", ".hidden.pdf", "../escape.pdf", "a/b.pdf"] {
            assert!(
                matches!(
                    medium.write(name, b"x"),
                    Err(ClarionError::ArtifactPersistFailed { .. })
                ),
                "{name:?} should be rejected"
            );
        }
    }
}
