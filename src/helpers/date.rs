//! Date helper functions
//!
//! Published dates are accepted in ISO-8601 only. Locale-dependent spellings
//! like "Jan 5, 2024" are rejected instead of being guessed at.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fmt::{self, Write};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 date or date-time
///
/// Offsets are normalised to UTC; values without an offset are taken as UTC.
///
/// # Examples
/// ```
/// use quire::helpers::parse_date;
/// assert!(parse_date("2024-01-01").is_some());
/// assert!(parse_date("01/02/2024").is_none());
/// ```
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).naive_utc())
}

/// Format a date using a Moment.js-compatible format string
///
/// Characters that are not Moment tokens, `%` included, are copied as-is.
///
/// # Examples
/// ```
/// use quire::helpers::{format_date, parse_date};
/// let date = parse_date("2024-01-15").unwrap();
/// assert_eq!(format_date(&date, "YYYY-MM-DD").unwrap(), "2024-01-15");
/// ```
pub fn format_date(date: &NaiveDateTime, format: &str) -> Result<String, fmt::Error> {
    let chrono_format = moment_to_chrono_format(format);
    let mut out = String::new();
    write!(out, "{}", date.format(&chrono_format))?;
    Ok(out)
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest tokens first within each family
    let replacements = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("DDDD", "%j"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("hh", "%I"),
        ("mm", "%M"),
        ("ss", "%S"),
        ("dddd", "%A"),
        ("ddd", "%a"),
    ];

    // chrono reads `%` as the start of a specifier
    let mut result = format.replace('%', "%%");

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}
