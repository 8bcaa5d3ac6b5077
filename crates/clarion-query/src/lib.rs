//! # clarion-query
//!
//! The value-level building blocks of the Clarion report pipeline:
//!
//! 1. **Path extraction**: a restricted `$.a.b[0].c` path language with a
//!    single `[?(@.key==value)]` array filter clause ([`path`]).
//! 2. **Formatting**: raw values to display text by format kind and unit
//!    ([`format`]).
//! 3. **Classification**: numeric values to labelled, coloured buckets
//!    ([`classify`]).
//!
//! Every entry point is total. Bad paths and unformattable values degrade to
//! `null` / `"N/A"` instead of failing, so one broken field never takes down
//! a report.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use clarion_query::{extract, format_value, classify};
//!
//! let hr = extract(&record, "$.vitalsMap.vitals.heart_rate");
//! let text = format_value(&hr, FormatKind::Number, Some("bpm"));
//! ```

pub mod classify;
pub mod format;
pub mod path;

pub use classify::classify;
pub use format::{format_date, format_timestamp, format_value, numeric_value, NOT_AVAILABLE};
pub use path::{extract, resolve_path, PathError, PathExpression};
