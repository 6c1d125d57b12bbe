// src/curate/dates.rs
//! Tolerant date parsing for model-produced date strings.
//!
//! Fallback chain, first hit wins:
//! 1) ISO-8601 date or date-time (`Z` / offset suffix accepted)
//! 2) same, after stripping a short leading weekday (`"Thu, "`)
//! 3) explicit patterns against the original and the stripped string
//! 4) any embedded `YYYY-MM-DD`
//!
//! Only the calendar date survives; time of day and offset are dropped.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::OnceCell;
use regex::Regex;

/// A weekday prefix is a comma-delimited head of at most this many chars.
const MAX_WEEKDAY_PREFIX: usize = 10;

enum Pattern {
    Date(&'static str),
    DateTime(&'static str),
}

const PATTERNS: &[Pattern] = &[
    Pattern::Date("%Y-%m-%d"),
    Pattern::DateTime("%Y-%m-%dT%H:%M:%S"),
    Pattern::DateTime("%Y-%m-%d %H:%M:%S"),
    Pattern::Date("%m/%d/%Y"),
    Pattern::Date("%b %d, %Y"),
    Pattern::Date("%B %d, %Y"),
    Pattern::Date("%a, %b %d, %Y"),
    Pattern::Date("%A, %B %d, %Y"),
];

/// Resolve a date string to a calendar date. `None` means unparseable;
/// callers reject the record, nothing here panics or errors.
pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(d) = parse_iso(s) {
        return Some(d);
    }

    let stripped = strip_weekday(s);
    if let Some(rest) = stripped {
        if let Some(d) = parse_iso(rest) {
            return Some(d);
        }
    }

    for candidate in std::iter::once(s).chain(stripped) {
        if let Some(d) = parse_with_patterns(candidate) {
            return Some(d);
        }
    }

    embedded_iso_date(s)
}

fn parse_iso(s: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    // Offset-carrying forms; a trailing `Z` is the zero offset.
    let with_offset = match s.strip_suffix('Z').or_else(|| s.strip_suffix('z')) {
        Some(head) => format!("{head}+00:00"),
        None => s.to_string(),
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(&with_offset) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(&with_offset, fmt) {
            return Some(dt.date_naive());
        }
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// `"Thu, Aug 15, 2025"` -> `"Aug 15, 2025"`.
fn strip_weekday(s: &str) -> Option<&str> {
    let (head, rest) = s.split_once(',')?;
    if head.chars().count() > MAX_WEEKDAY_PREFIX {
        return None;
    }
    let rest = rest.trim_start();
    (!rest.is_empty()).then_some(rest)
}

fn parse_with_patterns(s: &str) -> Option<NaiveDate> {
    PATTERNS.iter().find_map(|p| match p {
        Pattern::Date(fmt) => NaiveDate::parse_from_str(s, fmt).ok(),
        Pattern::DateTime(fmt) => NaiveDateTime::parse_from_str(s, fmt).ok().map(|dt| dt.date()),
    })
}

fn embedded_iso_date(s: &str) -> Option<NaiveDate> {
    static RE_ISO_DATE: OnceCell<Regex> = OnceCell::new();
    let re = RE_ISO_DATE.get_or_init(|| Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap());
    re.find_iter(s)
        .find_map(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok())
}
