//! Evidence sanitizer for extraction traces
//!
//! An extraction trace lists field values an upstream extractor claims to
//! have found in a conversation, each attributed to a turn and optionally
//! backed by a snippet and a character span. This module checks those
//! claims against the turn text and explains the outcome per field.
//!
//! # Design Principles
//!
//! - **Never fails**: malformed claims become reason codes, not errors.
//! - **Never drops**: one sanitized claim and one report row per input claim, in order.
//! - **Bounded previews**: reports only carry whitespace-collapsed, capped text.
//! - **Offsets are a fixed point**: sanitizing a sanitized trace changes nothing.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tracesan::evidence::{format_sanitize_report, sanitize, MatchedBy, ReasonCode};
//!
//! let trace = json!({
//!     "turns": [{"text": "Patient visited North Hospital."}],
//!     "perField": [{
//!         "field": "hospital",
//!         "turnIndex": 0,
//!         "requestedSnippet": "North Hospital",
//!         "value": "North Hospital",
//!     }],
//! });
//!
//! let (sanitized, report) = sanitize(&trace);
//! assert_eq!(sanitized.per_field.len(), 1);
//! assert_eq!(report.per_field[0].reason, ReasonCode::Ok);
//! assert_eq!(report.per_field[0].matched_by, MatchedBy::Snippet);
//! println!("{}", format_sanitize_report(&report));
//! ```

pub mod input;
pub mod preview;
pub mod report;
pub mod sanitizer;
pub mod spans;
pub mod types;

pub use input::{
    extract_turn_text, read_json_file, unwrap_envelope, ExtractionTrace, FieldClaim, TraceError,
    CLAIM_LIST_KEYS, ENVELOPE_KEY, FIELD_NAME_KEYS, SNIPPET_KEYS, TURN_LIST_KEYS, TURN_TEXT_KEYS,
};
pub use preview::{normalize_whitespace, redact_preview, MIN_PREVIEW_LIMIT, PREVIEW_LIMIT};
pub use report::{format_sanitize_report, missing_field_count};
pub use sanitizer::{classify, sanitize, MatchFacts, Sanitizer};
pub use spans::{char_len, contains_evidence, repair_offsets, OffsetRepair};
pub use types::{
    FieldReport, MatchedBy, ReasonCode, SanitizeOutput, SanitizeReport, SanitizedTrace, TurnText,
};
