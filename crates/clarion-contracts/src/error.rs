//! Error types for the Clarion report pipeline.
//!
//! All fallible operations in the pipeline return `ClarionResult<T>`.
//! Field extraction is deliberately absent here: a path that cannot be
//! resolved yields a `null` value, never an error.

use thiserror::Error;

/// The unified error type for the Clarion pipeline.
#[derive(Debug, Error)]
pub enum ClarionError {
    /// No assessment record exists for the requested session.
    #[error("assessment data not found for session: {session_id}")]
    SessionNotFound { session_id: String },

    /// The record's assessment id has no registered report configuration.
    #[error("configuration not found for assessment: {assessment_id}")]
    ConfigNotFound { assessment_id: String },

    /// The document renderer failed. The reason is reported verbatim.
    #[error("report rendering failed: {reason}")]
    RenderFailed { reason: String },

    /// The rendered artifact could not be written to the artifact medium.
    ///
    /// Fatal for the request: the report is not considered generated.
    #[error("artifact persist failed: {reason}")]
    ArtifactPersistFailed { reason: String },

    /// The artifact medium exists but could not be enumerated.
    #[error("artifact listing failed: {reason}")]
    ArtifactListFailed { reason: String },

    /// A report configuration document is missing, malformed, or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A session data source could not be parsed into assessment records.
    #[error("invalid assessment record: {reason}")]
    InvalidRecord { reason: String },
}

/// Convenience alias used throughout the Clarion crates.
pub type ClarionResult<T> = Result<T, ClarionError>;
