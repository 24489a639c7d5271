//! Timestamp parsing and feed-facing date formatting.

use chrono::{DateTime, Utc};

/// Format for `lastUpdated` and `content.dateAdded` feed fields.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Format for `releaseDate` feed fields.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Render a UTC timestamp the way the Roku feed schema expects it.
pub fn format_utc_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Render a date-only string for `releaseDate` fields.
pub fn format_utc_date(ts: &DateTime<Utc>) -> String {
    ts.format(DATE_FORMAT).to_string()
}

/// Parse an ISO timestamp from a Vimeo response.
///
/// Vimeo sends RFC 3339 with either an offset or a trailing `Z`.
/// Missing or malformed values fall back to the current time, matching
/// how the rest of the pipeline treats incomplete records.
pub fn parse_vimeo_datetime(value: Option<&str>) -> DateTime<Utc> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now)
}
