// Timestamp normalization and bucket arithmetic. Strict parse is the hot
// path; the fallback chain only runs for inputs the fixed pattern rejects.

use chrono::{DateTime, Utc};

use crate::error::EventError;

/// Hot-path pattern: "2021-03-01 14:15:30.500000+0000". The fraction is
/// optional and the offset may carry a colon.
const STRICT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%z";

/// Tried in order after RFC 3339 when the strict parse fails.
const FALLBACK_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z"];

pub const MS_PER_MINUTE: i64 = 60_000;
pub const MS_PER_HOUR: i64 = 3_600_000;

/// Parses a raw event timestamp into a UTC instant, preserving absolute time.
///
/// Offsets truncated to fewer than 4 digits are right-padded with zeros
/// before parsing, so "+00" reads as "+0000". A timestamp with no "+" offset
/// introducer is malformed.
pub fn normalize(raw: &str) -> Result<DateTime<Utc>, EventError> {
    let Some(plus_idx) = raw.find('+') else {
        return Err(EventError::MalformedTimestamp(raw.to_string()));
    };

    let offset_len = raw.len() - (plus_idx + 1);
    let padded;
    let candidate = if offset_len < 4 {
        padded = format!("{}{}", raw, "0".repeat(4 - offset_len));
        padded.as_str()
    } else {
        raw
    };

    if let Ok(dt) = DateTime::parse_from_str(candidate, STRICT_FORMAT) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(candidate) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in FALLBACK_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(candidate, format) {
            return Ok(dt.with_timezone(&Utc));
        }
    }
    Err(EventError::MalformedTimestamp(raw.to_string()))
}

/// Floors an instant to its minute bucket, in epoch milliseconds.
pub fn minute_bucket_ms(instant: DateTime<Utc>) -> i64 {
    instant.timestamp_millis().div_euclid(MS_PER_MINUTE) * MS_PER_MINUTE
}

/// Floors a minute bucket to its hour bucket.
pub fn hour_bucket_ms(minute_ms: i64) -> i64 {
    minute_ms.div_euclid(MS_PER_HOUR) * MS_PER_HOUR
}

/// Renders an hour bucket the way query callers see it:
/// "2021-03-01 14:00:00+00:00".
pub fn format_hour(hour_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(hour_ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S%:z").to_string())
        .unwrap_or_else(|| hour_ms.to_string())
}
