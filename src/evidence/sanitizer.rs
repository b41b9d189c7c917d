//! Evidence sanitizer: reconcile field claims against turn text
//!
//! For every claim in an extraction trace the sanitizer checks the turn
//! index, clamps character offsets, looks for the snippet and value in the
//! turn, and records why the claim was accepted, repaired, or flagged. It
//! never fails: malformed input degrades to `invalid_turnIndex`, `none` and
//! empty previews, so it is safe to run against traces it did not produce.

use serde_json::Value;
use tracing::debug;

use super::input::{ExtractionTrace, FieldClaim};
use super::preview::{redact_preview, PREVIEW_LIMIT};
use super::spans::{char_len, contains_evidence, repair_offsets};
use super::types::{FieldReport, MatchedBy, ReasonCode, SanitizeReport, SanitizedTrace, TurnText};

/// What was observed for one claim against a valid turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchFacts {
    /// Offsets had to be clamped
    pub offset_fixed: bool,
    /// A non-empty snippet was supplied
    pub snippet_requested: bool,
    pub snippet_found: bool,
    pub value_found: bool,
}

/// Decision table for claims whose turn index resolved
///
/// `offset_fixed` outranks every other reason; `matchedBy` is decided by
/// the match facts alone. A found snippet wins over a found value.
pub fn classify(facts: MatchFacts) -> (ReasonCode, MatchedBy) {
    let (reason, matched_by) = match (facts.snippet_found, facts.snippet_requested, facts.value_found) {
        (true, _, _) => (ReasonCode::Ok, MatchedBy::Snippet),
        (false, true, true) => (ReasonCode::SnippetNotFound, MatchedBy::Value),
        (false, true, false) => (ReasonCode::SnippetNotFound, MatchedBy::None),
        (false, false, true) => (ReasonCode::Ok, MatchedBy::Value),
        (false, false, false) => (ReasonCode::ValueNotFound, MatchedBy::None),
    };

    if facts.offset_fixed {
        (ReasonCode::OffsetFixed, matched_by)
    } else {
        (reason, matched_by)
    }
}

/// Sanitizer with a configurable preview cap
#[derive(Debug, Clone, Copy)]
pub struct Sanitizer {
    preview_limit: usize,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self {
            preview_limit: PREVIEW_LIMIT,
        }
    }
}

impl Sanitizer {
    pub fn new(preview_limit: usize) -> Self {
        Self { preview_limit }
    }

    pub fn preview_limit(&self) -> usize {
        self.preview_limit
    }

    /// Sanitize a raw trace value (any JSON; non-objects yield empty output)
    pub fn sanitize(&self, raw: &Value) -> (SanitizedTrace, SanitizeReport) {
        self.sanitize_trace(&ExtractionTrace::from_value(raw))
    }

    /// Sanitize an already normalized trace
    pub fn sanitize_trace(&self, trace: &ExtractionTrace) -> (SanitizedTrace, SanitizeReport) {
        let mut report = SanitizeReport::default();
        let mut per_field = Vec::with_capacity(trace.claims.len());

        for claim in &trace.claims {
            let turn_text = resolve_turn(&trace.turns, claim.turn_index);
            let (sanitized, row) = self.sanitize_claim(claim, turn_text, &mut report);
            per_field.push(sanitized);
            report.per_field.push(row);
        }

        debug!(
            claims = report.per_field.len(),
            invalid = report.invalid_evidence_count,
            fixed = report.fixed_offset_count,
            "Sanitized extraction trace"
        );

        let sanitized = SanitizedTrace {
            turns: trace
                .turns
                .iter()
                .map(|text| TurnText { text: text.clone() })
                .collect(),
            per_field,
        };

        (sanitized, report)
    }

    fn sanitize_claim(
        &self,
        claim: &FieldClaim,
        turn_text: Option<&str>,
        report: &mut SanitizeReport,
    ) -> (Value, FieldReport) {
        let mut copy = claim.raw.clone();

        let (reason, matched_by) = match turn_text {
            None => {
                report.invalid_evidence_count += 1;
                (ReasonCode::InvalidTurnIndex, MatchedBy::None)
            }
            Some(text) => {
                let mut offset_fixed = false;

                if claim.has_offsets() {
                    let repair = repair_offsets(char_len(text), claim.start_char, claim.end_char);
                    if let Some(obj) = copy.as_object_mut() {
                        obj.insert("startChar".to_string(), repair.start.into());
                        obj.insert("endChar".to_string(), repair.end.into());
                    }
                    if repair.changed {
                        report.fixed_offset_count += 1;
                        offset_fixed = true;
                    }
                }

                classify(MatchFacts {
                    offset_fixed,
                    snippet_requested: claim.requested_snippet.is_some(),
                    snippet_found: contains_evidence(text, claim.requested_snippet.as_deref()),
                    value_found: contains_evidence(text, claim.value.as_deref()),
                })
            }
        };

        debug!(field = %claim.field, %reason, %matched_by, "Classified field claim");

        let row = FieldReport {
            field: claim.field.clone(),
            turn_index: claim.turn_index_raw.clone(),
            reason,
            matched_by,
            turn_text_preview: redact_preview(turn_text, self.preview_limit),
            snippet_preview: redact_preview(claim.requested_snippet.as_deref(), self.preview_limit),
            value_preview: redact_preview(claim.value.as_deref(), self.preview_limit),
        };

        (copy, row)
    }
}

/// Turn text for a claimed index, if it is in range
fn resolve_turn(turns: &[String], turn_index: Option<i64>) -> Option<&str> {
    let index = usize::try_from(turn_index?).ok()?;
    turns.get(index).map(String::as_str)
}

/// Sanitize with the default preview cap
pub fn sanitize(raw: &Value) -> (SanitizedTrace, SanitizeReport) {
    Sanitizer::default().sanitize(raw)
}
