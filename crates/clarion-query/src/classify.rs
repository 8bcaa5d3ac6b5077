//! Range classification of numeric values.
//!
//! Ranges are tested in declaration order and the first inclusive match
//! wins. A value sitting on a boundary shared by two ranges therefore belongs
//! to whichever range the config lists first.

use serde_json::Value;
use tracing::debug;

use clarion_contracts::{config::ClassificationSpec, report::Classification};

use crate::format::numeric_value;

/// Classify `value` against `spec`.
///
/// Returns `None` when the value is not numeric or no range contains it.
pub fn classify(value: &Value, spec: &ClassificationSpec) -> Option<Classification> {
    let number = numeric_value(value)?;

    let matched = spec.ranges.iter().find(|range| range.contains(number));
    match matched {
        Some(range) => Some(Classification {
            label: range.label.clone(),
            color: range.color.clone(),
        }),
        None => {
            debug!(value = number, ranges = spec.ranges.len(), "value outside every range");
            None
        }
    }
}
