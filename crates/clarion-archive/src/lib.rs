//! # clarion-archive
//!
//! Append-only storage for rendered Clarion reports.
//!
//! ## Overview
//!
//! Three implementations of
//! [`ArtifactMedium`](clarion_core::traits::ArtifactMedium):
//!
//! - [`FsArtifactMedium`]: one file per artifact in a directory; creation
//!   time from filesystem metadata.
//! - [`ManifestArtifactMedium`]: the same files plus a `report-metadata.json`
//!   manifest holding generation time and a SHA-256 digest per artifact.
//! - [`InMemoryArtifactMedium`]: a shared in-process map, for tests and
//!   previews.
//!
//! Every medium is create-only. Writing a filename that already exists fails
//! with `ArtifactPersistFailed` and leaves the stored bytes untouched.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use clarion_archive::FsArtifactMedium;
//! use clarion_core::ReportPipeline;
//!
//! let medium = FsArtifactMedium::new("./generated-reports");
//! let pipeline = ReportPipeline::new(sessions, configs, renderer, Box::new(medium));
//! ```

pub mod fs;
pub mod manifest;
pub mod memory;

pub use fs::FsArtifactMedium;
pub use manifest::{sha256_hex, ManifestArtifactMedium, ManifestEntry, MANIFEST_FILENAME};
pub use memory::InMemoryArtifactMedium;

// ── Tests ─────────────────────────────────────────────────────────────────────
