//! # clarion-config
//!
//! A file-backed report configuration registry for Clarion.
//!
//! ## Overview
//!
//! This crate provides [`FileConfigRegistry`], which implements the
//! [`ConfigRegistry`](clarion_core::traits::ConfigRegistry) trait. A
//! configuration document maps assessment ids to report configs and may be
//! written in TOML or JSON; both go through the same JSON Schema validation
//! and semantic checks before any config is handed out.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use clarion_config::FileConfigRegistry;
//!
//! let registry = FileConfigRegistry::from_file(Path::new("configs/assessments.toml"))?;
//! // Pass `registry` to `clarion_core::ReportPipeline::new(...)`.
//! ```
//!
//! ## Document shape
//!
//! ```toml
//! [as_card_01]
//! name = "Cardiac Assessment"
//!
//! [[as_card_01.sections]]
//! id = "vitals"
//! title = "Key Body Vitals"
//!
//! [[as_card_01.sections.fields]]
//! label = "Heart Rate"
//! path = "$.vitalsMap.vitals.heart_rate"
//! format = "number"
//! unit = "bpm"
//! ```

pub mod registry;
pub mod schema;

pub use registry::FileConfigRegistry;
pub use schema::{config_document_schema, validate_document};

// ── Tests ─────────────────────────────────────────────────────────────────────
