//! Lenient timestamp parsing for upstream date strings.
//!
//! The random user API emits RFC 3339 timestamps, but the contract only
//! promises "a date string", so anything a general-purpose date parser would
//! accept is tolerated here. Strings without an offset are read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

// `%z` accepts both `+0200` and `+02:00`.
const OFFSET_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%MZ",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parses `raw` into a UTC timestamp, or `None` if no supported format fits.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = OFFSET_DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NAIVE_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .or_else(|| parse_partial_date(raw))
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// `YYYY` or `YYYY-MM`, with the missing month and day taken as 1.
fn parse_partial_date(raw: &str) -> Option<NaiveDate> {
    let digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());
    let (year, month) = match raw.split_once('-') {
        Some((year, month)) if digits(year, 4) && digits(month, 2) => (year, month),
        None if digits(raw, 4) => (raw, "01"),
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_rfc3339_with_fraction() {
        let ts = parse_timestamp("2015-03-15T12:00:00.123Z").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2015, 3, 15));
    }

    #[test]
    fn converts_offsets_to_utc() {
        let ts = parse_timestamp("2015-03-15T23:30:00-02:00").unwrap();
        assert_eq!(ts.date_naive(), NaiveDate::from_ymd_opt(2015, 3, 16).unwrap());
    }

    #[test]
    fn parses_bare_date() {
        let ts = parse_timestamp("2015-03-15").unwrap();
        assert_eq!(ts.date_naive(), NaiveDate::from_ymd_opt(2015, 3, 15).unwrap());
    }

    #[test]
    fn parses_naive_date_time_and_rfc2822() {
        assert!(parse_timestamp("2015-03-15 08:15:00").is_some());
        assert!(parse_timestamp("Sun, 15 Mar 2015 12:00:00 +0000").is_some());
    }

    #[test]
    fn parses_short_times_and_compact_offsets() {
        let ts = parse_timestamp("2015-03-15T12:00Z").unwrap();
        assert_eq!((ts.hour(), ts.minute()), (12, 0));

        let ts = parse_timestamp("2015-03-15T12:00+02:00").unwrap();
        assert_eq!(ts.hour(), 10);

        let ts = parse_timestamp("2015-03-15T12:00:00.000+0000").unwrap();
        assert_eq!(ts.date_naive(), NaiveDate::from_ymd_opt(2015, 3, 15).unwrap());

        let ts = parse_timestamp("2015-03-15T23:30:00-0200").unwrap();
        assert_eq!(ts.date_naive(), NaiveDate::from_ymd_opt(2015, 3, 16).unwrap());
    }

    #[test]
    fn parses_year_and_year_month() {
        let ts = parse_timestamp("2015-03").unwrap();
        assert_eq!(ts.date_naive(), NaiveDate::from_ymd_opt(2015, 3, 1).unwrap());

        let ts = parse_timestamp("2015").unwrap();
        assert_eq!(ts.date_naive(), NaiveDate::from_ymd_opt(2015, 1, 1).unwrap());
    }

    #[test]
    fn rejects_partial_dates_out_of_range() {
        assert!(parse_timestamp("2015-13").is_none());
        assert!(parse_timestamp("2015-3").is_none());
        assert!(parse_timestamp("15").is_none());
    }

    #[test]
    fn rejects_garbage_and_impossible_dates() {
        assert!(parse_timestamp("not-a-date").is_none());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("2015-02-30").is_none());
        assert!(parse_timestamp("2015-13-01T00:00:00Z").is_none());
    }
}
