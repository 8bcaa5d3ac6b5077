//! # clarion-contracts
//!
//! Shared types, report models, and error contracts for the Clarion report
//! pipeline.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate: only data definitions and error types.

pub mod artifact;
pub mod config;
pub mod error;
pub mod record;
pub mod report;
pub mod summary;
