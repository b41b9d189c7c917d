//! Built-in demo trace for `tracesan demo`.
//!
//! The turns are already redacted placeholders, so the demo never touches
//! real user data. Each claim exercises one reason path.

use serde_json::{json, Value};

/// Toy extraction trace with one claim per reason code
pub fn demo_trace() -> Value {
    json!({
        "turns": [
            {"text": "[REDACTED] Patient visited North Hospital on 2024-07-03."},
            {"text": "[REDACTED] Follow-up scheduled with Dr. Smith next week."},
        ],
        "perField": [
            // clean match via snippet
            {
                "field": "hospital",
                "turnIndex": 0,
                "requestedSnippet": "North Hospital",
                "value": "North Hospital",
                "startChar": 27,
                "endChar": 41,
            },
            // no snippet, value matches
            {
                "field": "doctor",
                "turnIndex": 1,
                "value": "Dr. Smith",
                "startChar": 36,
                "endChar": 45,
            },
            // invalid turn index
            {
                "field": "admissionDate",
                "turnIndex": 5,
                "requestedSnippet": "2024-07-03",
                "value": "2024-07-03",
            },
            // offsets clamped
            {
                "field": "followup_note",
                "turnIndex": 1,
                "requestedSnippet": "next week",
                "startChar": -5,
                "endChar": 400,
            },
            // value absent from the turn
            {
                "field": "department",
                "turnIndex": 0,
                "value": "Cardiology",
            },
        ],
    })
}
