//! Collaborator interfaces consumed by the Clarion pipeline.
//!
//! These four traits are the complete boundary between the report core and
//! the outside world:
//!
//! - `SessionRepository`: read-only source of assessment records
//! - `ConfigRegistry`: report layouts keyed by assessment id
//! - `DocumentRenderer`: turns an assembled document into bytes
//! - `ArtifactMedium`: durable, append-only byte store for artifacts
//!
//! The pipeline owns one of each and never reaches past them. All of them
//! must be `Send + Sync`: each generation request may run on its own thread,
//! sharing nothing but these collaborators.

use clarion_contracts::{
    artifact::Artifact, config::ReportConfig, error::ClarionResult,
    record::AssessmentRecord, report::ReportDocument,
};

/// Supplies raw assessment records. The pipeline never mutates them.
pub trait SessionRepository: Send + Sync {
    /// Look up one record by its `session_id`.
    fn find_by_id(&self, session_id: &str) -> Option<AssessmentRecord>;

    /// Every record, in repository order.
    fn list_all(&self) -> Vec<AssessmentRecord>;
}

/// Supplies report configurations keyed by assessment type.
pub trait ConfigRegistry: Send + Sync {
    fn get(&self, assessment_id: &str) -> Option<&ReportConfig>;

    /// All registered assessment ids, sorted.
    fn assessment_ids(&self) -> Vec<String>;
}

/// Converts an assembled document into a binary artifact.
///
/// Formatting and classification of field values happen here, not during
/// assembly. Timeouts and cancellation are the renderer's own concern; the
/// pipeline treats a returned error as terminal for the request.
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, document: &ReportDocument) -> ClarionResult<Vec<u8>>;

    /// File extension of the produced artifacts, without the dot.
    fn extension(&self) -> &str;
}

/// A durable, append-only store for artifact bytes.
pub trait ArtifactMedium: Send + Sync {
    /// Store `bytes` under `filename`, which must not already exist.
    ///
    /// Implementations must publish the artifact atomically: a concurrent
    /// `list()` either sees the complete artifact or does not see it at all.
    fn write(&self, filename: &str, bytes: &[u8]) -> ClarionResult<Artifact>;

    /// Every stored artifact with the creation time recorded by the medium.
    ///
    /// A medium that has never been written to returns an empty list.
    fn list(&self) -> ClarionResult<Vec<Artifact>>;
}
