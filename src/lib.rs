//! tracesan - Evidence sanitizer for extraction traces
//!
//! Takes the field claims an extractor made about a multi-turn transcript
//! and checks each one against the turn it cites: is the turn index valid,
//! is the snippet really there, is the value really there, are the
//! character offsets inside the turn. Produces a sanitized trace with
//! repaired offsets and a per-field report of reason codes.
//!
//! # Modules
//!
//! - `evidence`: Sanitizer, report types, previews, report rendering
//! - `config`: Layered settings (env, config file, defaults)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Sanitize a trace and print the text report
//! tracesan sanitize --input 41_trace_raw.json
//!
//! # Emit sanitized trace + report as JSON
//! cat trace.json | tracesan sanitize --format json
//!
//! # Count fields with missing evidence in a stored report
//! tracesan missing --report 44_sanitize_reasons.json --final-trace 43_trace_final.json
//! ```

pub mod cli;
pub mod config;
pub mod evidence;

// Re-export main types at crate root for convenience
pub use evidence::{
    format_sanitize_report, sanitize, FieldReport, MatchedBy, ReasonCode, SanitizeReport,
    SanitizedTrace, Sanitizer,
};
