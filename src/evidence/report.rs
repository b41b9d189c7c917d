//! Human-readable rendering and summary statistics for sanitize reports

use serde_json::Value;

use super::types::SanitizeReport;

/// Render a compact report for console display
///
/// Aggregate counts come first, then one header line per field followed by
/// its non-empty previews, in report order.
pub fn format_sanitize_report(report: &SanitizeReport) -> String {
    let mut lines = vec![
        format!("invalidEvidenceCount: {}", report.invalid_evidence_count),
        format!("fixedOffsetCount: {}", report.fixed_offset_count),
    ];

    for row in &report.per_field {
        // JSON text of the claimed index: 0, "3", 1.5 or null
        lines.push(format!(
            "- field='{}' turnIndex={} reason={} matchedBy={}",
            row.field, row.turn_index, row.reason, row.matched_by
        ));

        for (label, preview) in [
            ("turnTextPreview", &row.turn_text_preview),
            ("snippetPreview", &row.snippet_preview),
            ("valuePreview", &row.value_preview),
        ] {
            if !preview.is_empty() {
                lines.push(format!("  {}: {}", label, preview));
            }
        }
    }

    lines.join("\n")
}

/// Estimate how many extraction fields look incomplete
///
/// Two signals are combined:
/// - report rows flagged by their reason code or `matchedBy == none`
/// - final-trace claims carrying neither a value nor a requested snippet
pub fn missing_field_count(report: &SanitizeReport, final_claims: &[Value]) -> usize {
    let flagged = report.per_field.iter().filter(|row| row.is_missing()).count();
    let empty = final_claims.iter().filter(|claim| is_empty_claim(claim)).count();
    flagged + empty
}

fn is_empty_claim(claim: &Value) -> bool {
    !is_truthy(claim.get("value")) && !is_truthy(claim.get("requestedSnippet"))
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
    }
}
