//! In-memory session repository.
//!
//! Records are held in insertion order; lookups return the first record whose
//! `session_id` matches.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use clarion_contracts::{
    error::{ClarionError, ClarionResult},
    record::AssessmentRecord,
};
use clarion_core::traits::SessionRepository;

use crate::mock_data::sample_sessions;

/// A read-only `SessionRepository` over records held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionRepository {
    records: Vec<AssessmentRecord>,
}

impl InMemorySessionRepository {
    pub fn new(records: Vec<AssessmentRecord>) -> Self {
        Self { records }
    }

    /// The bundled sample sessions.
    pub fn sample() -> Self {
        // The sample array is well formed; fall back to empty rather than panic.
        Self::from_value(sample_sessions()).unwrap_or_default()
    }

    /// Parse a JSON array of session records.
    ///
    /// # Errors
    ///
    /// `InvalidRecord` when the text is not JSON, is not an array, or holds
    /// an element that is not an object with a string `session_id`.
    pub fn from_json_str(s: &str) -> ClarionResult<Self> {
        let value: Value = serde_json::from_str(s).map_err(|e| ClarionError::InvalidRecord {
            reason: format!("failed to parse session data: {}", e),
        })?;
        Self::from_value(value)
    }

    /// Read and parse a JSON array of session records from `path`.
    pub fn from_file(path: &Path) -> ClarionResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ClarionError::InvalidRecord {
            reason: format!("failed to read session data '{}': {}", path.display(), e),
        })?;
        Self::from_json_str(&contents)
    }

    pub fn from_value(value: Value) -> ClarionResult<Self> {
        let Value::Array(items) = value else {
            return Err(ClarionError::InvalidRecord {
                reason: "session data must be a JSON array of records".to_string(),
            });
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let record = AssessmentRecord::new(item);
                if record.document().is_object() && record.session_id().is_some() {
                    Ok(record)
                } else {
                    Err(ClarionError::InvalidRecord {
                        reason: format!(
                            "record {} must be an object with a string '{}'",
                            index,
                            AssessmentRecord::SESSION_ID_KEY
                        ),
                    })
                }
            })
            .collect::<ClarionResult<Vec<_>>>()?;

        debug!(records = records.len(), "session repository loaded");
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn find_by_id(&self, session_id: &str) -> Option<AssessmentRecord> {
        self.records
            .iter()
            .find(|r| r.session_id() == Some(session_id))
            .cloned()
    }

    fn list_all(&self) -> Vec<AssessmentRecord> {
        self.records.clone()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use clarion_contracts::error::ClarionError;
    use clarion_core::traits::SessionRepository;

    use super::InMemorySessionRepository;

    #[test]
    fn sample_has_every_bundled_session() {
        let repo = InMemorySessionRepository::sample();
        let ids: Vec<String> = repo
            .list_all()
            .iter()
            .filter_map(|r| r.session_id().map(str::to_string))
            .collect();
        assert_eq!(ids, vec!["session_001", "session_002", "session_003", "session_004"]);
    }

    #[test]
    fn find_by_id_returns_matching_record() {
        let repo = InMemorySessionRepository::sample();
        let record = repo.find_by_id("session_002").unwrap();
        assert_eq!(record.assessment_id(), Some("as_card_01"));
        assert!(repo.find_by_id("session_999").is_none());
    }

    #[test]
    fn first_duplicate_wins() {
        let repo = InMemorySessionRepository::from_json_str(
            r#"[{"session_id": "s", "n": 1}, {"session_id": "s", "n": 2}]"#,
        )
        .unwrap();
        let record = repo.find_by_id("s").unwrap();
        assert_eq!(record.document()["n"], 1);
    }

    #[test]
    fn rejects_non_array() {
        let err = InMemorySessionRepository::from_json_str(r#"{"session_id": "s"}"#).unwrap_err();
        assert!(matches!(err, ClarionError::InvalidRecord { .. }));
    }

    #[test]
    fn rejects_record_without_session_id() {
        let err =
            InMemorySessionRepository::from_json_str(r#"[{"session_id": "s"}, {"id": 2}]"#)
                .unwrap_err();
        match err {
            ClarionError::InvalidRecord { reason } => assert!(reason.contains("record 1")),
            other => panic!("expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            InMemorySessionRepository::from_json_str("[{"),
            Err(ClarionError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn from_file_reads_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        std::fs::write(&path, r#"[{"session_id": "a"}, {"session_id": "b"}]"#).unwrap();

        let repo = InMemorySessionRepository::from_file(&path).unwrap();
        assert_eq!(repo.len(), 2);

        let missing = InMemorySessionRepository::from_file(&dir.path().join("none.json"));
        assert!(matches!(missing, Err(ClarionError::InvalidRecord { .. })));
    }
}
