use chrono::{DateTime, SecondsFormat, Utc};
use std::time::SystemTime;

/// Formats a timestamp as an RFC 3339 / ISO 8601 string in UTC, to the second.
pub fn iso8601(st: SystemTime) -> String {
    DateTime::<Utc>::from(st).to_rfc3339_opts(SecondsFormat::Secs, true)
}
