//! Short, single-line previews for sanitize reports
//!
//! Reports must never carry raw turn text beyond a fixed cap, so every
//! string shown to a reviewer goes through [`redact_preview`].

/// Default preview cap in characters
pub const PREVIEW_LIMIT: usize = 120;

const ELLIPSIS: &str = "...";

/// Smallest cap that still fits the truncation marker
pub const MIN_PREVIEW_LIMIT: usize = ELLIPSIS.len();

/// Normalize whitespace: collapse runs of whitespace to single space, trim
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapse whitespace and cap `text` at `limit` characters
///
/// Longer strings keep their first `limit - 3` characters followed by
/// `...`, so the result is exactly `limit` characters long. Below
/// [`MIN_PREVIEW_LIMIT`] the marker itself is cut to fit.
pub fn redact_preview(text: Option<&str>, limit: usize) -> String {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return String::new();
    };

    let squished = normalize_whitespace(text);
    if squished.chars().count() <= limit {
        return squished;
    }

    if limit < MIN_PREVIEW_LIMIT {
        return ELLIPSIS[..limit].to_string();
    }

    let mut preview: String = squished.chars().take(limit - ELLIPSIS.len()).collect();
    preview.push_str(ELLIPSIS);
    preview
}
