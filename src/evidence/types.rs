//! Sanitize report and sanitized trace data types
//!
//! These types represent the `42_trace_sanitized.json` and
//! `44_sanitize_reasons.json` schemas (camelCase keys).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Why a field claim was accepted, repaired, or flagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// Evidence found in the referenced turn
    Ok,
    /// turnIndex missing, not an integer, or out of range
    #[serde(rename = "invalid_turnIndex")]
    InvalidTurnIndex,
    /// A snippet was requested but is not in the turn text
    SnippetNotFound,
    /// No snippet requested and the value is not in the turn text
    ValueNotFound,
    /// Character offsets were clamped into the turn text
    OffsetFixed,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::Ok => "ok",
            ReasonCode::InvalidTurnIndex => "invalid_turnIndex",
            ReasonCode::SnippetNotFound => "snippet_not_found",
            ReasonCode::ValueNotFound => "value_not_found",
            ReasonCode::OffsetFixed => "offset_fixed",
        }
    }

    /// Reasons that mean the claim has no usable evidence
    pub fn indicates_missing(&self) -> bool {
        matches!(
            self,
            ReasonCode::InvalidTurnIndex | ReasonCode::SnippetNotFound | ReasonCode::ValueNotFound
        )
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which part of the claim was located in the turn text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedBy {
    Snippet,
    Value,
    None,
}

impl MatchedBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchedBy::Snippet => "snippet",
            MatchedBy::Value => "value",
            MatchedBy::None => "none",
        }
    }
}

impl std::fmt::Display for MatchedBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One diagnostic row per field claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReport {
    /// Field name or path (empty if the claim had none)
    pub field: String,
    /// Turn index exactly as claimed (null when absent)
    #[serde(default)]
    pub turn_index: Value,
    /// Final classification
    pub reason: ReasonCode,
    /// What matched in the turn text
    pub matched_by: MatchedBy,
    /// Redacted preview of the referenced turn text
    #[serde(default)]
    pub turn_text_preview: String,
    /// Redacted preview of the requested snippet
    #[serde(default)]
    pub snippet_preview: String,
    /// Redacted preview of the claimed value
    #[serde(default)]
    pub value_preview: String,
}

impl FieldReport {
    /// True when this row should count towards a run's missing fields
    pub fn is_missing(&self) -> bool {
        self.reason.indicates_missing() || self.matched_by == MatchedBy::None
    }
}

/// Aggregate sanitize report (`44_sanitize_reasons.json`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizeReport {
    /// Claims whose turnIndex did not resolve to a turn
    #[serde(default)]
    pub invalid_evidence_count: usize,
    /// Claims whose offsets were clamped
    #[serde(default)]
    pub fixed_offset_count: usize,
    /// One row per input claim, in input order
    #[serde(default)]
    pub per_field: Vec<FieldReport>,
}

/// A turn re-emitted as plain text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnText {
    pub text: String,
}

/// Sanitized trace (`42_trace_sanitized.json`)
///
/// Claims are kept as JSON so attributes the sanitizer does not know about
/// pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizedTrace {
    pub turns: Vec<TurnText>,
    pub per_field: Vec<Value>,
}

/// Both sanitizer outputs, as the CLI prints them in JSON mode
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizeOutput {
    pub sanitized_trace: SanitizedTrace,
    pub sanitize_report: SanitizeReport,
}
