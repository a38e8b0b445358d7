use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::process::utils::clean_str;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
];

/// Parse a calendar date from the date forms seen in vaccination exports.
/// Any time-of-day component is discarded.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = clean_str(s);
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(&s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&s, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(&s)
        .ok()
        .map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_forms() {
        assert_eq!(parse_date("2021-05-01"), Some(ymd(2021, 5, 1)));
        assert_eq!(parse_date("2021/05/01"), Some(ymd(2021, 5, 1)));
        assert_eq!(parse_date("05/01/2021"), Some(ymd(2021, 5, 1)));
        assert_eq!(parse_date(" \"2021-05-01\" "), Some(ymd(2021, 5, 1)));
        assert_eq!(parse_date("2021-05-01 13:45:00"), Some(ymd(2021, 5, 1)));
        assert_eq!(parse_date("2021-05-01T13:45:00"), Some(ymd(2021, 5, 1)));
        assert_eq!(
            parse_date("05/01/2021 12:00:00 AM"),
            Some(ymd(2021, 5, 1))
        );
        assert_eq!(
            parse_date("2021-05-01T23:00:00-05:00"),
            Some(ymd(2021, 5, 1))
        );
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("bad"), None);
        assert_eq!(parse_date("2021-13-01"), None);
        assert_eq!(parse_date("02/30/2021"), None);
    }
}
