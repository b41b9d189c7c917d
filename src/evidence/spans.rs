//! Offset repair and evidence matching against turn text
//!
//! # Design Decisions
//!
//! - **Exact match only**: snippets and values are matched as literal,
//!   case-sensitive substrings. No whitespace or punctuation folding.
//! - **Character offsets**: `startChar`/`endChar` count Unicode scalar
//!   values, not UTF-8 bytes, so lengths here use `chars().count()`.
//! - **Empty never matches**: an empty or absent needle is "not requested".

/// Result of clamping a claimed span into a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetRepair {
    pub start: i64,
    pub end: i64,
    /// Whether either bound differs from what was claimed
    pub changed: bool,
}

/// Length of a turn in characters
pub fn char_len(text: &str) -> i64 {
    text.chars().count() as i64
}

/// Clamp a claimed span into `[0, text_len]`
///
/// A missing start defaults to 0 and a missing end to `text_len`; defaults
/// are not counted as changes. The result always satisfies
/// `0 <= start <= end <= text_len`.
///
/// # Arguments
/// * `text_len` - Length of the turn text in characters
/// * `start_char` - Claimed start offset, if any
/// * `end_char` - Claimed end offset, if any
pub fn repair_offsets(text_len: i64, start_char: Option<i64>, end_char: Option<i64>) -> OffsetRepair {
    let start = start_char.unwrap_or(0);
    let end = end_char.unwrap_or(text_len);

    let fixed_start = start.clamp(0, text_len);
    let fixed_end = end.min(text_len).max(fixed_start);

    OffsetRepair {
        start: fixed_start,
        end: fixed_end,
        changed: fixed_start != start || fixed_end != end,
    }
}

/// Whether `needle` was given and occurs verbatim in `text`
pub fn contains_evidence(text: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) if !needle.is_empty() => text.contains(needle),
        _ => false,
    }
}
