use chrono::{DateTime, SecondsFormat, Utc};

/// Get current Unix timestamp in UTC (milliseconds)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Format a Unix timestamp (milliseconds) as RFC 3339 in UTC, e.g. `2024-01-01T00:00:00.000Z`
///
/// Timestamps outside chrono's representable range are logged and formatted as the Unix epoch.
pub fn timestamp_to_rfc3339(millis: i64) -> String {
    let datetime = DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_else(|| {
        tracing::warn!("Timestamp {} is out of range, formatting as Unix epoch", millis);
        DateTime::<Utc>::UNIX_EPOCH
    });
    datetime.to_rfc3339_opts(SecondsFormat::Millis, true)
}
