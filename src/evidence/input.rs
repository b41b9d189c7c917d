//! Normalization of loosely typed extraction traces
//!
//! Upstream producers name things inconsistently (`turns` vs
//! `conversation`, `snippet` vs `evidence`, ...). Aliases are resolved once
//! here into [`ExtractionTrace`] and [`FieldClaim`]; nothing in this module
//! fails on unexpected shapes, it falls back to empty values instead.

use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;

/// Keys that may hold the turn list, highest priority first
pub const TURN_LIST_KEYS: &[&str] = &["turns", "conversation", "conversationTurns", "turnTexts"];

/// Keys that may hold a turn's text when the turn is an object
pub const TURN_TEXT_KEYS: &[&str] = &["text", "content", "turnText", "message"];

/// Keys that may hold the per-field claim list
pub const CLAIM_LIST_KEYS: &[&str] = &["perField", "fields"];

/// Keys that may hold a claim's field name
pub const FIELD_NAME_KEYS: &[&str] = &["field", "name", "path"];

/// Keys that may hold a claim's requested snippet
pub const SNIPPET_KEYS: &[&str] = &["requestedSnippet", "snippet", "evidence"];

/// Envelope key used by bundle snapshots (`41_trace_raw.json` and friends)
pub const ENVELOPE_KEY: &str = "extractionTrace";

/// Errors reading a trace from disk or text
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("failed to read trace file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("trace is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One extraction claim with aliases resolved
#[derive(Debug, Clone, PartialEq)]
pub struct FieldClaim {
    /// Field name or path, empty if none was given
    pub field: String,
    /// Claimed turn, only set for JSON integers
    pub turn_index: Option<i64>,
    /// `turnIndex` exactly as claimed (null when absent), echoed in reports
    pub turn_index_raw: Value,
    /// Snippet the claimant says supports the value
    pub requested_snippet: Option<String>,
    /// Claimed value rendered as text; `None` when falsy or not a scalar
    pub value: Option<String>,
    pub start_char: Option<i64>,
    pub end_char: Option<i64>,
    /// The claim exactly as received
    pub raw: Value,
}

impl FieldClaim {
    /// Resolve a single claim entry
    pub fn from_value(raw: &Value) -> Self {
        let obj = raw.as_object();

        Self {
            field: obj
                .and_then(|o| first_non_empty_str(o, FIELD_NAME_KEYS))
                .unwrap_or_default()
                .to_string(),
            turn_index: obj.and_then(|o| o.get("turnIndex")).and_then(as_integer),
            turn_index_raw: obj
                .and_then(|o| o.get("turnIndex"))
                .cloned()
                .unwrap_or(Value::Null),
            requested_snippet: obj
                .and_then(|o| first_non_empty_str(o, SNIPPET_KEYS))
                .map(str::to_string),
            value: obj.and_then(|o| o.get("value")).and_then(scalar_text),
            start_char: obj.and_then(|o| o.get("startChar")).and_then(as_integer),
            end_char: obj.and_then(|o| o.get("endChar")).and_then(as_integer),
            raw: raw.clone(),
        }
    }

    /// Whether either offset was supplied as an integer
    pub fn has_offsets(&self) -> bool {
        self.start_char.is_some() || self.end_char.is_some()
    }
}

/// Extraction trace with turns reduced to text and claims resolved
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionTrace {
    pub turns: Vec<String>,
    pub claims: Vec<FieldClaim>,
}

impl ExtractionTrace {
    /// Normalize a raw trace value. Non-object input yields an empty trace.
    pub fn from_value(trace: &Value) -> Self {
        let Some(obj) = trace.as_object() else {
            return Self::default();
        };

        Self {
            turns: extract_turns(obj),
            claims: extract_claims(obj)
                .iter()
                .map(FieldClaim::from_value)
                .collect(),
        }
    }

    /// Parse JSON text, unwrap a bundle envelope, and normalize
    pub fn from_json_str(text: &str) -> Result<Self, TraceError> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(unwrap_envelope(&value)))
    }
}

/// Read a JSON document from disk
pub async fn read_json_file(path: &Path) -> Result<Value, TraceError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| TraceError::Io {
            path: path.display().to_string(),
            source,
        })?;
    Ok(serde_json::from_str(&text)?)
}

/// Return the inner trace of an `{"extractionTrace": {...}}` envelope,
/// or the value itself when there is no envelope
pub fn unwrap_envelope(value: &Value) -> &Value {
    match value.get(ENVELOPE_KEY) {
        Some(inner) if inner.is_object() => inner,
        _ => value,
    }
}

/// Reduce a single turn to its text
pub fn extract_turn_text(turn: &Value) -> String {
    match turn {
        Value::String(text) => text.clone(),
        Value::Object(obj) => TURN_TEXT_KEYS
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_str))
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

/// Turn texts from the first alias that holds an array
fn extract_turns(obj: &Map<String, Value>) -> Vec<String> {
    TURN_LIST_KEYS
        .iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_array))
        .map(|turns| turns.iter().map(extract_turn_text).collect())
        .unwrap_or_default()
}

/// Claim entries from the first alias that holds a non-empty array
fn extract_claims(obj: &Map<String, Value>) -> &[Value] {
    CLAIM_LIST_KEYS
        .iter()
        .find_map(|key| {
            obj.get(*key)
                .and_then(Value::as_array)
                .filter(|claims| !claims.is_empty())
        })
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn first_non_empty_str<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_str).filter(|s| !s.is_empty()))
}

/// JSON integers only; floats, strings and booleans are not indices.
/// Integers above `i64::MAX` saturate so they still clamp as out of range.
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX))),
        _ => None,
    }
}

/// Text form of a truthy scalar value
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_turn_list_priority() {
        let trace = json!({
            "conversation": ["second"],
            "turns": ["first"],
        });
        let parsed = ExtractionTrace::from_value(&trace);
        assert_eq!(parsed.turns, vec!["first".to_string()]);
    }

    #[test]
    fn test_turn_list_skips_non_arrays() {
        let trace = json!({
            "turns": "not a list",
            "turnTexts": ["fallback"],
        });
        let parsed = ExtractionTrace::from_value(&trace);
        assert_eq!(parsed.turns, vec!["fallback".to_string()]);
    }

    #[test]
    fn test_turn_text_shapes() {
        assert_eq!(extract_turn_text(&json!("plain")), "plain");
        assert_eq!(extract_turn_text(&json!({"content": "c"})), "c");
        assert_eq!(extract_turn_text(&json!({"message": "m", "turnText": "t"})), "t");
        // text key that is not a string is skipped
        assert_eq!(extract_turn_text(&json!({"text": 7, "content": "c"})), "c");
        assert_eq!(extract_turn_text(&json!({"speaker": "doctor"})), "");
        assert_eq!(extract_turn_text(&json!(42)), "");
        assert_eq!(extract_turn_text(&Value::Null), "");
    }

    #[test]
    fn test_claim_list_falls_through_empty_per_field() {
        let trace = json!({
            "turns": [],
            "perField": [],
            "fields": [{"field": "a"}],
        });
        let parsed = ExtractionTrace::from_value(&trace);
        assert_eq!(parsed.claims.len(), 1);
        assert_eq!(parsed.claims[0].field, "a");
    }

    #[test]
    fn test_claim_aliases() {
        let claim = FieldClaim::from_value(&json!({
            "name": "",
            "path": "patient.hospital",
            "snippet": "",
            "evidence": "North",
            "value": "North Hospital",
        }));
        assert_eq!(claim.field, "patient.hospital");
        assert_eq!(claim.requested_snippet.as_deref(), Some("North"));
        assert_eq!(claim.value.as_deref(), Some("North Hospital"));
    }

    #[test]
    fn test_claim_integer_fields() {
        let claim = FieldClaim::from_value(&json!({
            "turnIndex": 1.0,
            "startChar": "3",
            "endChar": 9,
        }));
        assert_eq!(claim.turn_index, None);
        assert_eq!(claim.start_char, None);
        assert_eq!(claim.end_char, Some(9));
        assert!(claim.has_offsets());

        let claim = FieldClaim::from_value(&json!({"turnIndex": true}));
        assert_eq!(claim.turn_index, None);
        assert_eq!(claim.turn_index_raw, json!(true));
    }

    #[test]
    fn test_huge_integers_saturate() {
        let claim = FieldClaim::from_value(&json!({
            "turnIndex": u64::MAX,
            "startChar": u64::MAX,
            "endChar": -7,
        }));
        assert_eq!(claim.turn_index, Some(i64::MAX));
        assert_eq!(claim.start_char, Some(i64::MAX));
        assert_eq!(claim.end_char, Some(-7));
        assert_eq!(claim.turn_index_raw, json!(u64::MAX));
    }

    #[test]
    fn test_scalar_values() {
        assert_eq!(scalar_text(&json!(42)), Some("42".to_string()));
        assert_eq!(scalar_text(&json!(true)), Some("true".to_string()));
        assert_eq!(scalar_text(&json!(0)), None);
        assert_eq!(scalar_text(&json!(false)), None);
        assert_eq!(scalar_text(&json!("")), None);
        assert_eq!(scalar_text(&json!(["a"])), None);
        assert_eq!(scalar_text(&Value::Null), None);
    }

    #[test]
    fn test_non_object_inputs() {
        assert_eq!(ExtractionTrace::from_value(&json!([1, 2])), ExtractionTrace::default());

        let claim = FieldClaim::from_value(&json!("just a string"));
        assert_eq!(claim.field, "");
        assert_eq!(claim.turn_index, None);
        assert_eq!(claim.turn_index_raw, Value::Null);
        assert_eq!(claim.raw, json!("just a string"));
    }

    #[test]
    fn test_unwrap_envelope() {
        let bare = json!({"turns": ["a"]});
        assert_eq!(unwrap_envelope(&bare), &bare);

        let wrapped = json!({"extractionTrace": {"turns": ["a"]}});
        assert_eq!(unwrap_envelope(&wrapped), &bare);

        let odd = json!({"extractionTrace": "nope"});
        assert_eq!(unwrap_envelope(&odd), &odd);
    }

    #[test]
    fn test_from_json_str() {
        let parsed =
            ExtractionTrace::from_json_str(r#"{"extractionTrace": {"turns": ["x"], "perField": [{}]}}"#)
                .unwrap();
        assert_eq!(parsed.turns.len(), 1);
        assert_eq!(parsed.claims.len(), 1);

        let err = ExtractionTrace::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, TraceError::Json(_)));
    }
}
