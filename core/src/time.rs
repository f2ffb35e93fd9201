//! Time related utils.
//!
//! Two textual forms are produced from the same clock and they are not
//! interchangeable: authorization values embed [`format_iso8601`] while
//! session tokens embed [`format_unix_seconds`].

use chrono::Utc;

/// DateTime is the alias for chrono::DateTime<Utc>.
pub type DateTime = chrono::DateTime<Utc>;

/// Create a new DateTime from current time.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into ISO 8601 with separators: "2022-03-13T07:20:04Z"
///
/// Sub-second precision is dropped.
pub fn format_iso8601(t: DateTime) -> String {
    t.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Format time into Unix epoch seconds: "1647156004"
pub fn format_unix_seconds(t: DateTime) -> String {
    t.timestamp().to_string()
}

/// Parse time from ISO 8601 with separators: "2022-03-13T07:20:04Z"
pub fn parse_iso8601(s: &str) -> crate::Result<DateTime> {
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%SZ")
        .map(|v| v.and_utc())
        .map_err(|e| {
            crate::Error::unexpected(format!("parse '{s}' into iso8601 failed")).with_source(e)
        })
}
