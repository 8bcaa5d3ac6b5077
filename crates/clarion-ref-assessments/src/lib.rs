//! # clarion-ref-assessments
//!
//! Reference runtime for the Clarion report pipeline.
//!
//! Provides ready-made collaborators so the pipeline can run end to end
//! without external systems:
//!
//! - [`InMemorySessionRepository`]: sessions from a JSON array, or the
//!   bundled fictional samples in [`mock_data`]
//! - [`builtin_registry`]: report layouts for the Health & Fitness
//!   (`as_hr_02`) and Cardiac (`as_card_01`) assessments, shipped as TOML
//! - [`HtmlRenderer`]: standalone HTML pages with formatted values and
//!   classification badges
//!
//! All data is hardcoded and fictional.

pub mod configs;
pub mod mock_data;
pub mod renderer;
pub mod repository;

pub use configs::{builtin_registry, BUILTIN_CONFIG};
pub use renderer::HtmlRenderer;
pub use repository::InMemorySessionRepository;

// ── Tests ─────────────────────────────────────────────────────────────────────
