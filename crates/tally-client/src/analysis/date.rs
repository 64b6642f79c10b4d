use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

pub fn format_iso_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses the calendar date of an ISO-8601 date or timestamp. The time of
/// day and any offset are dropped.
pub fn parse_expense_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    let date_part = trimmed.get(..10)?;
    if !looks_like_iso_date(date_part) {
        return None;
    }

    if trimmed.len() == 10 {
        return NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok();
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp.date_naive());
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|timestamp| timestamp.date())
}

/// Linear month position relative to January of `min_year`.
pub fn month_index(date: NaiveDate, min_year: i32) -> i64 {
    i64::from(date.year() - min_year) * 12 + i64::from(date.month())
}

fn looks_like_iso_date(value: &str) -> bool {
    if value.len() != 10 {
        return false;
    }
    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return false;
        }
    }
    true
}
