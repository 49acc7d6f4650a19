use chrono::{NaiveDate, NaiveDateTime};

const LONG_DATE_TIME: &str = "%Y-%m-%d %H:%M:%S";
const LONG_DATE_TIME_WITHOUT_SECONDS: &str = "%Y-%m-%d %H:%M";
const LONG_DATE: &str = "%Y-%m-%d";

pub fn is_valid_date_time_format(s: &str) -> bool {
    NaiveDateTime::parse_from_str(s, LONG_DATE_TIME).is_ok()
}

pub fn is_valid_date_time_without_seconds_format(s: &str) -> bool {
    NaiveDateTime::parse_from_str(s, LONG_DATE_TIME_WITHOUT_SECONDS).is_ok()
}

pub fn is_valid_date_format(s: &str) -> bool {
    NaiveDate::parse_from_str(s, LONG_DATE).is_ok()
}

/// Widens a date or minute-precision timestamp to `YYYY-MM-DD HH:MM:SS`.
/// Anything unrecognized is returned untouched.
pub fn to_long_date_time(s: &str) -> String {
    if is_valid_date_time_format(s) {
        return s.to_string();
    }

    if is_valid_date_time_without_seconds_format(s) {
        return format!("{s}:00");
    }

    if is_valid_date_format(s) {
        return format!("{s} 00:00:00");
    }

    s.to_string()
}

pub fn parse_long_date_time(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, LONG_DATE_TIME).ok()
}
