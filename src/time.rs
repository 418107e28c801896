//! Time window helpers for `${START_TIME}`/`${END_TIME}` queries

use chrono::{DateTime, SecondsFormat, Utc};
use std::time::Duration;

/// RFC 3339 bounds of the window ending now and spanning `duration`
pub fn time_range_last(duration: Duration) -> (String, String) {
    time_range_ending(Utc::now(), duration)
}

/// RFC 3339 bounds of the window ending at `end` and spanning `duration`
pub fn time_range_ending(end: DateTime<Utc>, duration: Duration) -> (String, String) {
    let span = chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX);
    let start = end.checked_sub_signed(span).unwrap_or(DateTime::<Utc>::MIN_UTC);
    (
        start.to_rfc3339_opts(SecondsFormat::Secs, true),
        end.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}
