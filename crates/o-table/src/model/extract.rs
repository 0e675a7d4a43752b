//! Cell value extraction.
//!
//! Turns markup-laden cell content into the plain-text token that type
//! coercion works on.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

use super::cell::CellMarkup;

static EMPTY_CELL_INDICATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^n[./]a\.?$").expect("BUG: hardcoded regex is statically valid")
});

/// Extract the normalized sort token of a cell.
///
/// Image alternative text takes priority over everything else. Otherwise a
/// parseable `<time datetime>` yields its epoch milliseconds, and plain text
/// falls back to inline `aria-label`/`title` attributes for icon-only cells.
/// Trailing reference asterisks and empty-cell indicators are removed.
pub fn extract(cell: &impl CellMarkup) -> String {
    if let Some(alts) = cell.image_alts() {
        return normalize(alts.concat().trim());
    }

    if let Some(millis) = cell.machine_timestamp().and_then(parse_timestamp) {
        return millis.to_string();
    }

    let mut text = cell.text_content().trim().to_string();
    if text.is_empty() {
        text = cell.inline_labels().join(" ").trim().to_string();
    }

    normalize(&text)
}

fn normalize(text: &str) -> String {
    remove_empty_cell_indicators(remove_reference_asterisk(text)).to_string()
}

/// Strip trailing `*` reference markers.
pub fn remove_reference_asterisk(text: &str) -> &str {
    text.trim_end_matches('*')
}

/// Map `n/a`, `n.a`, `n.a.` (any case) and `-` to the empty string.
pub fn remove_empty_cell_indicators(text: &str) -> &str {
    if text == "-" || EMPTY_CELL_INDICATOR.is_match(text) {
        ""
    } else {
        text
    }
}

/// Parse a machine-readable timestamp into UTC epoch milliseconds.
///
/// Accepts RFC 3339 instants, plain dates, and local date-times without an
/// offset (read as UTC).
pub fn parse_timestamp(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.timestamp_millis());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().timestamp_millis())
}
