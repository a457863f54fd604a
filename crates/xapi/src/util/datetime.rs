//! Timestamp handling.
//!
//! Statement timestamps are RFC 3339 with an explicit offset, which is kept.
//! HTTP `Last-Modified` headers are RFC 1123 dates and are normalized to UTC.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};

use crate::error::ValidationError;

/// Parses an RFC 3339 timestamp, keeping its offset.
pub fn parse_timestamp(text: &str) -> Result<DateTime<FixedOffset>, ValidationError> {
    DateTime::parse_from_rfc3339(text).map_err(|_| ValidationError::InvalidTimestamp {
        value: text.to_string(),
    })
}

/// Formats a timestamp in RFC 3339 with only as many fractional digits as
/// needed (0, 3, 6 or 9). A zero offset is written as `Z`.
pub fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses an HTTP date such as `Fri, 18 Jun 2021 22:21:11 GMT`.
///
/// Returns `None` for anything unparseable; a bad header never fails a read.
pub fn parse_http_date(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(text.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Formats a UTC instant for a `since`/`until` query parameter.
pub fn format_query_time(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
