//! Display formatting for extracted values.
//!
//! Formatting happens at render time, never during assembly. Every function
//! here is total: a value that cannot be shown in the requested form becomes
//! the `"N/A"` sentinel rather than an error or a `NaN`-bearing string.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use clarion_contracts::config::FormatKind;

/// Shown for missing, empty, or unformattable values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Format `value` as `kind`, appending `unit` after a single space.
///
/// `null` and the empty string always produce `"N/A"`, and the unit is never
/// appended to the sentinel.
pub fn format_value(value: &Value, kind: FormatKind, unit: Option<&str>) -> String {
    if is_blank(value) {
        return NOT_AVAILABLE.to_string();
    }

    let body = match kind {
        FormatKind::Percentage => numeric_value(value).map(|n| fixed(n, 1)),
        FormatKind::Decimal => numeric_value(value).map(|n| fixed(n, 2)),
        FormatKind::Number | FormatKind::Time => {
            numeric_value(value).map(|n| format!("{:.0}", round_half_up(n)))
        }
        FormatKind::Text => display_text(value),
    };

    match (body, unit) {
        (Some(body), Some(unit)) if !unit.is_empty() => format!("{} {}", body, unit),
        (Some(body), _) => body,
        (None, _) => NOT_AVAILABLE.to_string(),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Round to the nearest integer, halves toward positive infinity.
///
/// The result is never negative zero, so `-0.4` prints as `"0"`.
fn round_half_up(n: f64) -> f64 {
    let rounded = if n - n.floor() == 0.5 {
        n.ceil()
    } else {
        n.round()
    };
    rounded + 0.0
}

/// Fixed-point text with `digits` decimals.
///
/// `format!` rounds exact binary ties to even (`72.25` becomes `"72.2"`);
/// here they round away from zero (`"72.3"`). Values that only look like
/// ties in decimal, such as `1.005`, keep their exact-value rounding.
fn fixed(n: f64, digits: usize) -> String {
    let scale = 10f64.powi(digits as i32);
    let magnitude = n.abs();
    let scaled = magnitude * scale;
    let exact_tie = scaled.fract() == 0.5 && magnitude.mul_add(scale, -scaled) == 0.0;
    if exact_tie {
        format!("{:.*}", digits, scaled.ceil().copysign(n) / scale)
    } else {
        format!("{:.*}", digits, n)
    }
}

/// Read `value` as a finite float.
///
/// Numbers are taken as-is. Strings contribute their longest leading decimal
/// number (`"12.5kg"` is 12.5, `"  -3e2 "` is -300). Booleans, composites,
/// and strings without a numeric prefix yield `None`.
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        Value::String(s) => leading_number(s),
        _ => None,
    }
}

fn leading_number(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let int_end = digits_from(end);
    let mut digit_count = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        let frac_count = frac_end - (end + 1);
        if digit_count > 0 || frac_count > 0 {
            digit_count += frac_count;
            end = frac_end;
        }
    }

    if digit_count == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+') | Some(b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Render a report timestamp, e.g. `"March 4, 2025, 09:05 AM"`.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%B %-d, %Y, %I:%M %p").to_string()
}

/// Render a timestamp stored in a record: an RFC 3339 string or a number of
/// epoch milliseconds. Anything else is `"N/A"`.
pub fn format_date(value: &Value) -> String {
    let parsed = match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    };
    parsed
        .map(|dt| format_timestamp(&dt))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};

    use clarion_contracts::config::FormatKind;

    use super::{format_date, format_timestamp, format_value, numeric_value, NOT_AVAILABLE};

    // ── Sentinel handling ─────────────────────────────────────────────────────

    #[test]
    fn null_is_not_available_for_every_kind_and_unit() {
        for kind in FormatKind::ALL {
            for unit in [None, Some("%"), Some("bpm"), Some("")] {
                assert_eq!(
                    format_value(&Value::Null, kind, unit),
                    NOT_AVAILABLE,
                    "kind {kind} unit {unit:?}"
                );
            }
        }
    }

    #[test]
    fn empty_string_is_not_available() {
        for kind in FormatKind::ALL {
            assert_eq!(format_value(&json!(""), kind, Some("mmHg")), "N/A");
        }
    }

    #[test]
    fn unparsable_numerics_are_not_available() {
        assert_eq!(format_value(&json!("abc"), FormatKind::Decimal, Some("%")), "N/A");
        assert_eq!(format_value(&json!(true), FormatKind::Number, None), "N/A");
        assert_eq!(format_value(&json!({ "v": 1 }), FormatKind::Percentage, None), "N/A");
        assert_eq!(format_value(&json!([1, 2]), FormatKind::Time, None), "N/A");
    }

    // ── Kinds ─────────────────────────────────────────────────────────────────

    #[test]
    fn percentage_has_one_decimal() {
        assert_eq!(format_value(&json!(80), FormatKind::Percentage, Some("%")), "80.0 %");
        assert_eq!(format_value(&json!("97.46"), FormatKind::Percentage, None), "97.5");
    }

    #[test]
    fn decimal_has_two_decimals() {
        assert_eq!(format_value(&json!(22.857), FormatKind::Decimal, None), "22.86");
        assert_eq!(format_value(&json!("18"), FormatKind::Decimal, Some("%")), "18.00 %");
    }

    #[test]
    fn exact_ties_round_away_from_zero() {
        assert_eq!(format_value(&json!(0.25), FormatKind::Percentage, None), "0.3");
        assert_eq!(format_value(&json!(72.25), FormatKind::Percentage, Some("%")), "72.3 %");
        assert_eq!(format_value(&json!(1.125), FormatKind::Decimal, None), "1.13");
        assert_eq!(format_value(&json!(-1.125), FormatKind::Decimal, None), "-1.13");
        // 1.005 is stored just below the tie.
        assert_eq!(format_value(&json!(1.005), FormatKind::Decimal, None), "1.00");
    }

    #[test]
    fn number_and_time_round_to_integers() {
        assert_eq!(format_value(&json!(72.4), FormatKind::Number, Some("bpm")), "72 bpm");
        assert_eq!(format_value(&json!(2.5), FormatKind::Number, None), "3");
        assert_eq!(format_value(&json!(-2.5), FormatKind::Number, None), "-2");
        assert_eq!(format_value(&json!(-0.4), FormatKind::Number, None), "0");
        assert_eq!(format_value(&json!(-0.5), FormatKind::Number, None), "0");
        assert_eq!(format_value(&json!(0.49999999999999994), FormatKind::Number, None), "0");
        assert_eq!(format_value(&json!(612.6), FormatKind::Time, Some("seconds")), "613 seconds");
    }

    #[test]
    fn string_kind_passes_through() {
        assert_eq!(format_value(&json!("as_hr_02"), FormatKind::Text, None), "as_hr_02");
        assert_eq!(format_value(&json!(42), FormatKind::Text, Some("kg")), "42 kg");
        assert_eq!(format_value(&json!(false), FormatKind::Text, None), "false");
        assert_eq!(format_value(&json!({ "a": 1 }), FormatKind::Text, None), "N/A");
    }

    #[test]
    fn empty_unit_is_not_appended() {
        assert_eq!(format_value(&json!(5), FormatKind::Number, Some("")), "5");
    }

    #[test]
    fn decimal_then_string_is_stable() {
        for x in [0.0, 1.0, 3.14159, -2.71828, 1234.5678, 1e-7, 98765.4321] {
            let decimal = format_value(&json!(x), FormatKind::Decimal, None);
            let again = format_value(&json!(decimal.clone()), FormatKind::Text, None);
            assert_eq!(again, decimal);
        }
    }

    // ── Numeric parsing ───────────────────────────────────────────────────────

    #[test]
    fn numeric_value_reads_leading_number() {
        assert_eq!(numeric_value(&json!("12.5kg")), Some(12.5));
        assert_eq!(numeric_value(&json!("  -3e2 ")), Some(-300.0));
        assert_eq!(numeric_value(&json!(".5")), Some(0.5));
        assert_eq!(numeric_value(&json!("7.")), Some(7.0));
        assert_eq!(numeric_value(&json!("1e")), Some(1.0));
        assert_eq!(numeric_value(&json!("-")), None);
        assert_eq!(numeric_value(&json!(".")), None);
        assert_eq!(numeric_value(&json!("kg12")), None);
        assert_eq!(numeric_value(&Value::Null), None);
    }

    // ── Dates ─────────────────────────────────────────────────────────────────

    #[test]
    fn format_timestamp_is_long_form() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 4, 9, 5, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "March 4, 2025, 09:05 AM");
    }

    #[test]
    fn format_date_accepts_rfc3339_and_millis() {
        assert_eq!(format_date(&json!("2025-03-04T21:30:00Z")), "March 4, 2025, 09:30 PM");
        assert_eq!(format_date(&json!(0)), "January 1, 1970, 12:00 AM");
        assert_eq!(format_date(&json!("yesterday")), "N/A");
        assert_eq!(format_date(&Value::Null), "N/A");
    }
}
