//! Input token isolation and field parsing.
//!
//! The gateway re-delivers the full accumulated input on every turn
//! (`"1*10000*2000"`), so the engine must isolate the newest segment before
//! dispatching. Field parsers are shared by the flow handlers; they reject
//! rather than coerce.

use chrono::NaiveDate;

/// Reserved token for one-level back-navigation.
///
/// Treated as "go back" everywhere except session start; no menu may assign
/// it a meaning of its own.
pub const BACK_SENTINEL: &str = "00";

/// Isolates the newest atomic input from the gateway's accumulated text.
///
/// Returns the portion after the last `*`, trimmed. An empty accumulated
/// text yields an empty token (session start).
pub fn latest_input(text: &str) -> &str {
    match text.rfind('*') {
        Some(pos) => text[pos + 1..].trim(),
        None => text.trim(),
    }
}

/// Parses a non-negative whole amount in KES.
///
/// Rejects empty input, signs, separators, and anything non-numeric; `"-5"`
/// is a rejection, not a negative amount.
pub fn parse_amount(input: &str) -> Option<i64> {
    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    input.parse::<i64>().ok()
}

/// Parses a calendar date entered as `YYYY-MM-DD`.
///
/// The shape is checked first so `2026-2-1` and other near-misses are
/// rejected even where the underlying parser would accept them; the parse
/// then rejects impossible dates like `2026-02-30`.
pub fn parse_iso_date(input: &str) -> Option<NaiveDate> {
    if !has_iso_date_shape(input) {
        return None;
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

/// Accepts trimmed, non-empty free text.
pub fn clean_text(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn has_iso_date_shape(input: &str) -> bool {
    let bytes = input.as_bytes();
    if bytes.len() != 10 {
        return false;
    }
    bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    })
}
