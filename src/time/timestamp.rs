use crate::time::error::Error;
use chrono::{DateTime, NaiveDateTime, Utc};

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z"];
const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parses the `started-at`/`finished-at` values of a report.
///
/// The remote engine writes RFC 3339 values, but older releases emit a
/// numeric offset without colon or a literal `Z` after local time. Values
/// without any zone are taken as UTC.
pub fn parse_instant(value: &str) -> Result<DateTime<Utc>, Error> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS.iter() {
        if let Ok(parsed) = DateTime::parse_from_str(value, format) {
            return Ok(parsed.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS.iter() {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(DateTime::from_utc(parsed, Utc));
        }
    }
    Err(Error::Timestamp(value.to_owned()))
}
