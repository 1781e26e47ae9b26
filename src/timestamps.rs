use chrono::{DateTime, NaiveDateTime, ParseResult, Utc};

const BARE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parses a tracker timestamp into a UTC instant.
/// RFC3339 values are converted to UTC; values without a zone are taken as UTC.
pub fn parse_timestamp(value: &str) -> ParseResult<DateTime<Utc>> {
    let value = value.trim();
    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(_) => NaiveDateTime::parse_from_str(value, BARE_FORMAT).map(|naive| naive.and_utc()),
    }
}

/// Formats an instant as a bare UTC timestamp with no zone suffix
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(BARE_FORMAT).to_string()
}
