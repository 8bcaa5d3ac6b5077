//! The Clarion report pipeline: the caller-facing entry point.
//!
//! The pipeline runs one report generation as:
//!
//!   Session lookup → Config lookup → Assemble → Render → Name → Persist
//!
//! Lookup failures (`SessionNotFound`, `ConfigNotFound`) and I/O failures
//! (`RenderFailed`, `ArtifactPersistFailed`) are returned to the caller.
//! Extraction problems never are: they show up as `null` field values in an
//! otherwise complete report. Nothing is retried.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use clarion_contracts::{
    artifact::Artifact,
    config::ReportConfig,
    error::{ClarionError, ClarionResult},
    record::AssessmentRecord,
    report::ReportDocument,
    summary::{ConfigSummary, SessionSummary},
};

use crate::{
    artifact::ArtifactStore,
    assembler::assemble,
    traits::{ArtifactMedium, ConfigRegistry, DocumentRenderer, SessionRepository},
};

/// Shown in session listings when no config is registered for a record.
pub const UNKNOWN_ASSESSMENT: &str = "Unknown Assessment";

/// Wires the four collaborators together.
///
/// The pipeline holds no per-request state, so one instance can serve
/// concurrent requests from several threads.
pub struct ReportPipeline {
    sessions: Box<dyn SessionRepository>,
    configs: Box<dyn ConfigRegistry>,
    renderer: Box<dyn DocumentRenderer>,
    store: ArtifactStore,
}

impl ReportPipeline {
    /// Build a pipeline. Artifacts are stored with the renderer's extension.
    pub fn new(
        sessions: Box<dyn SessionRepository>,
        configs: Box<dyn ConfigRegistry>,
        renderer: Box<dyn DocumentRenderer>,
        medium: Box<dyn ArtifactMedium>,
    ) -> Self {
        let store = ArtifactStore::new(medium, renderer.extension());
        Self {
            sessions,
            configs,
            renderer,
            store,
        }
    }

    /// Render and persist a report for `session_id`, stamped with the
    /// current time.
    pub fn generate(&self, session_id: &str) -> ClarionResult<Artifact> {
        self.generate_at(session_id, Utc::now())
    }

    /// Render and persist a report for `session_id` as of `now`.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` / `ConfigNotFound` before anything is rendered
    /// - `RenderFailed` from the renderer, passed through verbatim
    /// - `ArtifactPersistFailed` when the medium rejects the write
    pub fn generate_at(&self, session_id: &str, now: DateTime<Utc>) -> ClarionResult<Artifact> {
        let request_id = Uuid::new_v4();
        debug!(request_id = %request_id, session_id = %session_id, "report generation starting");

        let (record, config) = self.resolve(session_id)?;
        let document = assemble(&record, config, now);

        let bytes = self.renderer.render(&document).inspect_err(|e| {
            warn!(
                request_id = %request_id,
                session_id = %session_id,
                error = %e,
                "renderer failed"
            );
        })?;

        let filename = self.store.name_artifact(session_id, now);
        let artifact = self.store.persist(&filename, &bytes)?;

        info!(
            request_id = %request_id,
            session_id = %session_id,
            assessment = %document.assessment_name,
            filename = %artifact.filename,
            size = bytes.len(),
            unresolved_fields = document.unresolved_count(),
            "report generated"
        );

        Ok(artifact)
    }

    /// Assemble the report model without rendering or persisting anything.
    pub fn preview_assembly(&self, session_id: &str) -> ClarionResult<ReportDocument> {
        let (record, config) = self.resolve(session_id)?;
        Ok(assemble(&record, config, Utc::now()))
    }

    /// Every persisted artifact, newest first.
    pub fn list_artifacts(&self) -> ClarionResult<Vec<Artifact>> {
        self.store.list()
    }

    /// One summary row per record in the repository.
    pub fn sessions(&self) -> Vec<SessionSummary> {
        self.sessions
            .list_all()
            .iter()
            .map(|record| {
                let assessment_id = record.assessment_id().unwrap_or_default();
                let assessment_name = self
                    .configs
                    .get(assessment_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| UNKNOWN_ASSESSMENT.to_string());
                SessionSummary {
                    session_id: record.session_id().unwrap_or_default().to_string(),
                    assessment_id: assessment_id.to_string(),
                    assessment_name,
                    timestamp: record.timestamp().cloned(),
                }
            })
            .collect()
    }

    /// The raw record for `session_id` plus its config, if one is registered.
    pub fn session_detail(
        &self,
        session_id: &str,
    ) -> ClarionResult<(AssessmentRecord, Option<&ReportConfig>)> {
        let record = self.find_session(session_id)?;
        let config = record.assessment_id().and_then(|id| self.configs.get(id));
        Ok((record, config))
    }

    /// One summary row per registered configuration.
    pub fn config_summaries(&self) -> Vec<ConfigSummary> {
        self.configs
            .assessment_ids()
            .into_iter()
            .filter_map(|id| {
                self.configs.get(&id).map(|config| ConfigSummary {
                    name: config.name.clone(),
                    sections_count: config.sections.len(),
                    total_fields: config.total_fields(),
                    assessment_id: id,
                })
            })
            .collect()
    }

    pub fn config(&self, assessment_id: &str) -> ClarionResult<&ReportConfig> {
        self.configs
            .get(assessment_id)
            .ok_or_else(|| ClarionError::ConfigNotFound {
                assessment_id: assessment_id.to_string(),
            })
    }

    fn find_session(&self, session_id: &str) -> ClarionResult<AssessmentRecord> {
        self.sessions.find_by_id(session_id).ok_or_else(|| {
            warn!(session_id = %session_id, "session not found");
            ClarionError::SessionNotFound {
                session_id: session_id.to_string(),
            }
        })
    }

    fn resolve(&self, session_id: &str) -> ClarionResult<(AssessmentRecord, &ReportConfig)> {
        let record = self.find_session(session_id)?;
        let assessment_id = record.assessment_id().unwrap_or_default().to_string();
        let config = self.configs.get(&assessment_id).ok_or_else(|| {
            warn!(
                session_id = %session_id,
                assessment_id = %assessment_id,
                "no report configuration for assessment"
            );
            ClarionError::ConfigNotFound { assessment_id }
        })?;
        Ok((record, config))
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;

    use clarion_contracts::{
        artifact::Artifact,
        config::{FieldSpec, FormatKind, ReportConfig, Section},
        error::{ClarionError, ClarionResult},
        record::AssessmentRecord,
        report::ReportDocument,
    };

    use crate::traits::{ArtifactMedium, ConfigRegistry, DocumentRenderer, SessionRepository};

    use super::{ReportPipeline, UNKNOWN_ASSESSMENT};

    // ── Mock helpers ─────────────────────────────────────────────────────────

    struct VecRepository {
        records: Vec<AssessmentRecord>,
    }

    impl SessionRepository for VecRepository {
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

    struct MapRegistry {
        configs: BTreeMap<String, ReportConfig>,
    }

    impl ConfigRegistry for MapRegistry {
        fn get(&self, assessment_id: &str) -> Option<&ReportConfig> {
            self.configs.get(assessment_id)
        }

        fn assessment_ids(&self) -> Vec<String> {
            self.configs.keys().cloned().collect()
        }
    }

    /// A renderer that records every document it was handed.
    struct MockRenderer {
        rendered: Arc<Mutex<Vec<ReportDocument>>>,
        fail: bool,
    }

    impl DocumentRenderer for MockRenderer {
        fn render(&self, document: &ReportDocument) -> ClarionResult<Vec<u8>> {
            self.rendered.lock().unwrap().push(document.clone());
            if self.fail {
                return Err(ClarionError::RenderFailed {
                    reason: "headless browser exited with status 1".to_string(),
                });
            }
            Ok(format!("rendered {}", document.session_id).into_bytes())
        }

        fn extension(&self) -> &str {
            "pdf"
        }
    }

    /// A medium that records writes and can be told to reject them.
    struct MockMedium {
        written: Arc<Mutex<Vec<(Artifact, Vec<u8>)>>>,
        fail: bool,
    }

    impl ArtifactMedium for MockMedium {
        fn write(&self, filename: &str, bytes: &[u8]) -> ClarionResult<Artifact> {
            if self.fail {
                return Err(ClarionError::ArtifactPersistFailed {
                    reason: "read-only file system".to_string(),
                });
            }
            let artifact = Artifact {
                filename: filename.to_string(),
                path: PathBuf::from("/reports").join(filename),
                created_at: Utc::now(),
            };
            self.written.lock().unwrap().push((artifact.clone(), bytes.to_vec()));
            Ok(artifact)
        }

        fn list(&self) -> ClarionResult<Vec<Artifact>> {
            Ok(self.written.lock().unwrap().iter().map(|(a, _)| a.clone()).collect())
        }
    }

    struct Harness {
        pipeline: ReportPipeline,
        rendered: Arc<Mutex<Vec<ReportDocument>>>,
        written: Arc<Mutex<Vec<(Artifact, Vec<u8>)>>>,
    }

    fn health_config() -> ReportConfig {
        ReportConfig {
            name: "Health & Fitness Assessment".to_string(),
            sections: vec![Section {
                id: "overview".to_string(),
                title: "Assessment Overview".to_string(),
                enabled: true,
                fields: vec![FieldSpec {
                    label: "Overall Health Score".to_string(),
                    path: "$.accuracy".to_string(),
                    format: FormatKind::Percentage,
                    unit: Some("%".to_string()),
                    classification: None,
                }],
            }],
        }
    }

    fn harness(render_fails: bool, persist_fails: bool) -> Harness {
        let records = vec![
            AssessmentRecord::new(json!({
                "session_id": "session_001",
                "assessment_id": "as_hr_02",
                "timestamp": "2025-01-15T10:00:00Z",
                "accuracy": 80
            })),
            AssessmentRecord::new(json!({
                "session_id": "session_orphan",
                "assessment_id": "as_unknown"
            })),
        ];
        let mut configs = BTreeMap::new();
        configs.insert("as_hr_02".to_string(), health_config());

        let rendered = Arc::new(Mutex::new(vec![]));
        let written = Arc::new(Mutex::new(vec![]));

        let pipeline = ReportPipeline::new(
            Box::new(VecRepository { records }),
            Box::new(MapRegistry { configs }),
            Box::new(MockRenderer {
                rendered: Arc::clone(&rendered),
                fail: render_fails,
            }),
            Box::new(MockMedium {
                written: Arc::clone(&written),
                fail: persist_fails,
            }),
        );

        Harness {
            pipeline,
            rendered,
            written,
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_736_935_200_000).unwrap()
    }

    // ── generate ─────────────────────────────────────────────────────────────

    #[test]
    fn generate_renders_and_persists_once() {
        let h = harness(false, false);

        let artifact = h.pipeline.generate_at("session_001", at()).unwrap();

        assert_eq!(artifact.filename, "report-session_001-1736935200000.pdf");
        let rendered = h.rendered.lock().unwrap();
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].generated_at, at());
        assert_eq!(rendered[0].sections[0].fields[0].value, json!(80));

        let written = h.written.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].1, b"rendered session_001".to_vec());
    }

    #[test]
    fn generate_unknown_session_never_renders() {
        let h = harness(false, false);

        let err = h.pipeline.generate_at("session_404", at()).unwrap_err();

        match err {
            ClarionError::SessionNotFound { session_id } => assert_eq!(session_id, "session_404"),
            other => panic!("expected SessionNotFound, got {:?}", other),
        }
        assert!(h.rendered.lock().unwrap().is_empty());
        assert!(h.written.lock().unwrap().is_empty());
    }

    #[test]
    fn generate_without_config_is_config_not_found() {
        let h = harness(false, false);

        let err = h.pipeline.generate_at("session_orphan", at()).unwrap_err();

        match err {
            ClarionError::ConfigNotFound { assessment_id } => assert_eq!(assessment_id, "as_unknown"),
            other => panic!("expected ConfigNotFound, got {:?}", other),
        }
        assert!(h.rendered.lock().unwrap().is_empty());
    }

    #[test]
    fn render_failure_is_terminal_and_verbatim() {
        let h = harness(true, false);

        let err = h.pipeline.generate_at("session_001", at()).unwrap_err();

        match err {
            ClarionError::RenderFailed { reason } => {
                assert_eq!(reason, "headless browser exited with status 1")
            }
            other => panic!("expected RenderFailed, got {:?}", other),
        }
        assert!(h.written.lock().unwrap().is_empty(), "nothing may be persisted");
    }

    #[test]
    fn persist_failure_is_reported() {
        let h = harness(false, true);

        let err = h.pipeline.generate_at("session_001", at()).unwrap_err();

        assert!(matches!(err, ClarionError::ArtifactPersistFailed { .. }));
        assert_eq!(h.rendered.lock().unwrap().len(), 1);
    }

    // ── preview / listings ───────────────────────────────────────────────────

    #[test]
    fn preview_assembles_without_side_effects() {
        let h = harness(false, false);

        let doc = h.pipeline.preview_assembly("session_001").unwrap();

        assert_eq!(doc.assessment_name, "Health & Fitness Assessment");
        assert_eq!(doc.sections.len(), 1);
        assert!(h.rendered.lock().unwrap().is_empty());
        assert!(h.written.lock().unwrap().is_empty());
    }

    #[test]
    fn preview_propagates_lookup_errors() {
        let h = harness(false, false);
        assert!(matches!(
            h.pipeline.preview_assembly("nope"),
            Err(ClarionError::SessionNotFound { .. })
        ));
        assert!(matches!(
            h.pipeline.preview_assembly("session_orphan"),
            Err(ClarionError::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn list_artifacts_reflects_generated_reports() {
        let h = harness(false, false);
        h.pipeline.generate_at("session_001", at()).unwrap();

        let listed = h.pipeline.list_artifacts().unwrap();

        assert_eq!(listed.len(), 1);
        assert!(listed[0].filename.starts_with("report-session_001-"));
    }

    #[test]
    fn sessions_name_unknown_assessments() {
        let h = harness(false, false);

        let sessions = h.pipeline.sessions();

        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].assessment_name, "Health & Fitness Assessment");
        assert_eq!(sessions[0].timestamp, Some(json!("2025-01-15T10:00:00Z")));
        assert_eq!(sessions[1].assessment_name, UNKNOWN_ASSESSMENT);
        assert_eq!(sessions[1].timestamp, None);
    }

    #[test]
    fn session_detail_reports_missing_config_as_none() {
        let h = harness(false, false);

        let (record, config) = h.pipeline.session_detail("session_orphan").unwrap();
        assert_eq!(record.assessment_id(), Some("as_unknown"));
        assert!(config.is_none());

        let (_, config) = h.pipeline.session_detail("session_001").unwrap();
        assert_eq!(config.map(|c| c.name.as_str()), Some("Health & Fitness Assessment"));
    }

    #[test]
    fn config_summaries_count_sections_and_fields() {
        let h = harness(false, false);

        let summaries = h.pipeline.config_summaries();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].assessment_id, "as_hr_02");
        assert_eq!(summaries[0].sections_count, 1);
        assert_eq!(summaries[0].total_fields, 1);
        assert!(h.pipeline.config("as_hr_02").is_ok());
        assert!(matches!(
            h.pipeline.config("as_zz"),
            Err(ClarionError::ConfigNotFound { .. })
        ));
    }
}
