//! Record dates and Monday-anchored week buckets.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a record date.
///
/// Accepts a calendar date (`2025-03-14`) or an ISO-8601 date-time, whose
/// date part is used.
pub fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// The Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Period key of the week containing `date`.
pub fn week_key(date: NaiveDate) -> String {
    week_start(date).format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn monday_is_its_own_week_start() {
        // 2025-01-06 is a Monday.
        assert_eq!(week_start(d("2025-01-06")), d("2025-01-06"));
    }

    #[test]
    fn sunday_belongs_to_previous_monday() {
        assert_eq!(week_start(d("2025-01-12")), d("2025-01-06"));
        assert_eq!(week_start(d("2025-01-13")), d("2025-01-13"));
    }

    #[test]
    fn week_crosses_year_boundary() {
        // 2025-01-01 is a Wednesday; its week starts on 2024-12-30.
        assert_eq!(week_key(d("2025-01-01")), "2024-12-30");
    }

    #[test]
    fn parses_dates_and_date_times() {
        assert_eq!(parse_record_date("2025-03-14"), Some(d("2025-03-14")));
        assert_eq!(parse_record_date("2025-03-14T23:10:00Z"), Some(d("2025-03-14")));
        assert_eq!(parse_record_date("2025-03-14T08:00:00"), Some(d("2025-03-14")));
        assert_eq!(parse_record_date(" 2025-03-14 "), Some(d("2025-03-14")));
    }

    #[test]
    fn rejects_malformed_dates() {
        assert_eq!(parse_record_date("2025-02-30"), None);
        assert_eq!(parse_record_date("14/03/2025"), None);
        assert_eq!(parse_record_date(""), None);
    }
}
