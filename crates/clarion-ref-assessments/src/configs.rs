//! Report configurations bundled with the reference runtime.

use clarion_config::FileConfigRegistry;
use clarion_contracts::error::ClarionResult;

/// The bundled configuration document (TOML).
pub const BUILTIN_CONFIG: &str = include_str!("../configs/assessments.toml");

/// Load the bundled configuration through the same validation path as a
/// user-supplied file.
pub fn builtin_registry() -> ClarionResult<FileConfigRegistry> {
    FileConfigRegistry::from_toml_str(BUILTIN_CONFIG)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
