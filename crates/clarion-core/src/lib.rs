//! # clarion-core
//!
//! The configuration-driven report pipeline for Clarion.
//!
//! This crate provides:
//! - The four collaborator traits (`SessionRepository`, `ConfigRegistry`,
//!   `DocumentRenderer`, `ArtifactMedium`)
//! - The report assembler that turns a record and a config into a
//!   `ReportDocument`
//! - The artifact naming and listing policy (`ArtifactStore`)
//! - The `ReportPipeline` that wires them together
//!
//! ## Usage
//!
//! ```rust,ignore
//! use clarion_core::ReportPipeline;
//!
//! let pipeline = ReportPipeline::new(sessions, configs, renderer, medium);
//! let artifact = pipeline.generate("session_001")?;
//! ```

pub mod artifact;
pub mod assembler;
pub mod pipeline;
pub mod traits;

pub use artifact::{name_artifact, ArtifactStore};
pub use assembler::assemble;
pub use pipeline::ReportPipeline;
