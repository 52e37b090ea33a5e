// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Lenient date parsing shared by the date-range operator and schema detection.
//!
//! All naive forms are interpreted as UTC, which is how the editor's date
//! pickers store them.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::model::Scalar;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a textual timestamp.
///
/// Accepts RFC 3339, `YYYY-MM-DD`, `YYYY/MM/DD` and naive date-times with a
/// `T` or space separator.
pub fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive));
        }
    }
    None
}

/// Parse a cell as a timestamp. Numbers are epoch milliseconds.
pub fn parse_date(value: &Scalar) -> Option<DateTime<Utc>> {
    match value {
        Scalar::Text(text) => parse_date_text(text),
        Scalar::Number(millis) if millis.is_finite() => {
            Utc.timestamp_millis_opt(*millis as i64).single()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_supported_forms() {
        assert!(parse_date_text("2024-01-01T10:00:00Z").is_some());
        assert!(parse_date_text("2024-01-01T10:00:00+02:00").is_some());
        assert!(parse_date_text("2024-01-01 10:00:00").is_some());
        assert!(parse_date_text("2024-01-01T10:00").is_some());
        assert_eq!(parse_date_text("2024-03-05").unwrap().day(), 5);
        assert!(parse_date_text("not a date").is_none());
        assert!(parse_date_text("").is_none());
    }

    #[test]
    fn test_numbers_are_epoch_millis() {
        let parsed = parse_date(&Scalar::Number(0.0)).unwrap();
        assert_eq!(parsed.year(), 1970);
        assert!(parse_date(&Scalar::Bool(true)).is_none());
    }
}
