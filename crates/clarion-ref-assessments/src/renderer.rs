//! HTML document renderer.
//!
//! `HtmlRenderer` turns an assembled `ReportDocument` into a standalone HTML
//! page. Formatting and classification happen here, at render time: the
//! document carries raw values and the renderer decides how they look.
//!
//! Layout:
//!
//! - header with assessment name, session id and generation time
//! - one `<section>` per report section, fields as table rows
//! - a colored badge next to every field whose value falls in a
//!   classification range

use std::fmt::Write;

use tracing::debug;

use clarion_contracts::{
    error::{ClarionError, ClarionResult},
    report::{ExtractedField, ReportDocument},
};
use clarion_core::traits::DocumentRenderer;
use clarion_query::{classify, format_timestamp, format_value};

const STYLE: &str = "\
body{font-family:Helvetica,Arial,sans-serif;margin:24px;color:#222}\
header{border-bottom:2px solid #2b6cb0;margin-bottom:16px}\
h1{margin:0 0 4px 0;font-size:24px}\
.meta{color:#555;font-size:13px;margin:0 0 8px 0}\
section{margin-bottom:20px}\
h2{font-size:18px;color:#2b6cb0}\
table{width:100%;border-collapse:collapse}\
th,td{text-align:left;padding:6px 8px;border-bottom:1px solid #e2e8f0}\
th{width:40%;font-weight:600}\
.badge{display:inline-block;padding:2px 8px;border-radius:10px;color:#fff;font-size:12px}\
.empty{color:#777;font-style:italic}";

/// Renders reports as HTML pages with the `html` extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }

    fn write_page(&self, out: &mut String, document: &ReportDocument) -> std::fmt::Result {
        let title = escape(&document.assessment_name);

        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html lang=\"en\">")?;
        writeln!(out, "<head>")?;
        writeln!(out, "<meta charset=\"utf-8\">")?;
        writeln!(out, "<title>{} - {}</title>", title, escape(&document.session_id))?;
        writeln!(out, "<style>{}</style>", STYLE)?;
        writeln!(out, "</head>")?;
        writeln!(out, "<body>")?;

        writeln!(out, "<header>")?;
        writeln!(out, "<h1>{}</h1>", title)?;
        writeln!(
            out,
            "<p class=\"meta\">Session {} &middot; Generated {}</p>",
            escape(&document.session_id),
            escape(&format_timestamp(&document.generated_at))
        )?;
        writeln!(out, "</header>")?;

        for section in &document.sections {
            writeln!(out, "<section id=\"{}\">", escape(&section.id))?;
            writeln!(out, "<h2>{}</h2>", escape(&section.title))?;
            if section.fields.is_empty() {
                writeln!(out, "<p class=\"empty\">No fields configured.</p>")?;
            } else {
                writeln!(out, "<table>")?;
                for field in &section.fields {
                    self.write_field(out, field)?;
                }
                writeln!(out, "</table>")?;
            }
            writeln!(out, "</section>")?;
        }

        writeln!(out, "</body>")?;
        writeln!(out, "</html>")
    }

    fn write_field(&self, out: &mut String, field: &ExtractedField) -> std::fmt::Result {
        let shown = format_value(&field.value, field.format, field.unit.as_deref());
        let badge = field
            .classification
            .as_ref()
            .and_then(|spec| classify(&field.value, spec))
            .map(|c| {
                format!(
                    "<span class=\"badge\" style=\"background:{}\">{}</span>",
                    escape(&c.color),
                    escape(&c.label)
                )
            })
            .unwrap_or_default();

        writeln!(
            out,
            "<tr><th>{}</th><td>{}</td><td>{}</td></tr>",
            escape(&field.label),
            escape(&shown),
            badge
        )
    }
}

impl DocumentRenderer for HtmlRenderer {
    fn render(&self, document: &ReportDocument) -> ClarionResult<Vec<u8>> {
        let mut page = String::new();
        self.write_page(&mut page, document)
            .map_err(|e| ClarionError::RenderFailed {
                reason: format!("failed to write HTML for session {}: {}", document.session_id, e),
            })?;
        debug!(session_id = %document.session_id, size = page.len(), "HTML rendered");
        Ok(page.into_bytes())
    }

    fn extension(&self) -> &str {
        "html"
    }
}

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};

    use clarion_contracts::{
        config::{ClassificationSpec, FormatKind, Range},
        report::{ExtractedField, ReportDocument, ReportSection},
    };
    use clarion_core::traits::DocumentRenderer;

    use super::{escape, HtmlRenderer};

    fn field(label: &str, value: Value, format: FormatKind, unit: Option<&str>) -> ExtractedField {
        ExtractedField {
            label: label.to_string(),
            value,
            format,
            unit: unit.map(str::to_string),
            classification: None,
        }
    }

    fn heart_rate_ranges() -> ClassificationSpec {
        ClassificationSpec {
            ranges: vec![
                Range {
                    min: Some(0.0),
                    max: Some(60.0),
                    label: "Low".to_string(),
                    color: "blue".to_string(),
                },
                Range {
                    min: Some(60.0),
                    max: Some(100.0),
                    label: "Normal".to_string(),
                    color: "green".to_string(),
                },
            ],
        }
    }

    fn document(fields: Vec<ExtractedField>) -> ReportDocument {
        ReportDocument {
            assessment_name: "Health & Fitness Assessment".to_string(),
            session_id: "session_001".to_string(),
            generated_at: Utc.with_ymd_and_hms(2025, 1, 15, 14, 5, 0).unwrap(),
            sections: vec![ReportSection {
                id: "vitals".to_string(),
                title: "Key Body Vitals".to_string(),
                fields,
            }],
        }
    }

    fn render(document: &ReportDocument) -> String {
        String::from_utf8(HtmlRenderer::new().render(document).unwrap()).unwrap()
    }

    #[test]
    fn extension_is_html() {
        assert_eq!(HtmlRenderer::new().extension(), "html");
    }

    #[test]
    fn header_shows_escaped_name_and_timestamp() {
        let html = render(&document(vec![]));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Health &amp; Fitness Assessment</h1>"));
        assert!(html.contains("January 15, 2025, 02:05 PM"));
        assert!(html.contains("No fields configured."));
    }

    #[test]
    fn values_are_formatted_at_render_time() {
        let html = render(&document(vec![
            field("Overall Health Score", json!(80), FormatKind::Percentage, Some("%")),
            field("BMI", json!(22.41), FormatKind::Decimal, None),
            field("Blood Pressure (Diastolic)", Value::Null, FormatKind::Number, Some("mmHg")),
        ]));
        assert!(html.contains("<td>80.0 %</td>"));
        assert!(html.contains("<td>22.41</td>"));
        assert!(html.contains("<td>N/A</td>"));
    }

    #[test]
    fn classified_values_get_a_badge() {
        let mut heart_rate = field("Heart Rate", json!(60), FormatKind::Number, Some("bpm"));
        heart_rate.classification = Some(heart_rate_ranges());
        let html = render(&document(vec![heart_rate]));

        assert!(html.contains("<td>60 bpm</td>"));
        assert!(html.contains("<span class=\"badge\" style=\"background:blue\">Low</span>"));
    }

    #[test]
    fn unclassifiable_values_have_no_badge() {
        let mut heart_rate = field("Heart Rate", json!(250), FormatKind::Number, Some("bpm"));
        heart_rate.classification = Some(heart_rate_ranges());
        let html = render(&document(vec![heart_rate]));

        assert!(!html.contains("class=\"badge\" style"));
    }

    #[test]
    fn record_text_is_escaped() {
        let html = render(&document(vec![field(
            "Notes",
            json!("<script>alert('x')</script>"),
            FormatKind::Text,
            None,
        )]));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn escape_handles_every_special_character() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
