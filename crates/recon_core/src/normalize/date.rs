//! Date parsing across the formats seen on confirmations.

use chrono::{Datelike, NaiveDate};

use crate::types::NormalizationError;

/// Accepted formats, tried in order. Slash-separated day/month dates are
/// read month-first (US convention); dotted dates are read day-first.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y%m%d",
    "%d-%b-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%d-%b-%y",
    "%d %b %y",
    "%m/%d/%y",
];

/// Years outside this window are treated as misreads (`%Y` happily takes
/// `24` as the year 24).
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1900..=2200;

/// Parses a confirmation date into a calendar date.
///
/// Commas and ordinal suffixes (`1st`, `22nd`) are ignored, and a trailing
/// time component (`2024-01-15T10:00:00Z`) is dropped.
pub fn parse_date(raw: &str) -> Result<NaiveDate, NormalizationError> {
    let cleaned = clean(raw);

    let parsed = DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(&cleaned, fmt).ok())
        .find(|d| YEAR_RANGE.contains(&d.year()));
    if let Some(date) = parsed {
        return Ok(date);
    }

    // Timestamps: keep the leading ISO date.
    if let Some(head) = cleaned.split(['T', ' ']).next() {
        if head.len() < cleaned.len() {
            if let Ok(date) = NaiveDate::parse_from_str(head, "%Y-%m-%d") {
                if YEAR_RANGE.contains(&date.year()) {
                    return Ok(date);
                }
            }
        }
    }

    Err(NormalizationError::InvalidDate(raw.trim().to_string()))
}

fn clean(raw: &str) -> String {
    raw.replace(',', " ")
        .split_whitespace()
        .map(strip_ordinal)
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_ordinal(token: &str) -> &str {
    let lower = token.to_ascii_lowercase();
    for suffix in ["st", "nd", "rd", "th"] {
        if lower.len() > suffix.len() && lower.ends_with(suffix) {
            let head = &token[..token.len() - suffix.len()];
            if head.chars().all(|c| c.is_ascii_digit()) {
                return head;
            }
        }
    }
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_accepted_formats() {
        let expected = ymd(2024, 1, 15);
        for raw in [
            "2024-01-15",
            "2024/01/15",
            "20240115",
            "15-Jan-2024",
            "15 Jan 2024",
            "15 January 2024",
            "January 15, 2024",
            "Jan 15th, 2024",
            "01/15/2024",
            "15.01.2024",
            "15-Jan-24",
            "2024-01-15T09:30:00Z",
            "2024-01-15 09:30:00",
        ] {
            assert_eq!(parse_date(raw).unwrap(), expected, "failed on {}", raw);
        }
    }

    #[test]
    fn test_two_digit_year_not_read_as_year_24() {
        assert_eq!(parse_date("03/04/24").unwrap(), ymd(2024, 3, 4));
    }

    #[test]
    fn test_invalid_dates() {
        for raw in ["2024-02-30", "next tuesday", "13/45/2024", "15-Foo-2024"] {
            match parse_date(raw) {
                Err(NormalizationError::InvalidDate(v)) => assert_eq!(v, raw),
                other => panic!("expected InvalidDate for {}, got {:?}", raw, other),
            }
        }
    }

    #[test]
    fn test_strip_ordinal() {
        assert_eq!(strip_ordinal("1st"), "1");
        assert_eq!(strip_ordinal("22nd"), "22");
        assert_eq!(strip_ordinal("August"), "August");
        assert_eq!(strip_ordinal("th"), "th");
    }
}
