//! Timestamp helpers.
//!
//! All timestamps are stored as RFC 3339 UTC strings with millisecond
//! precision, so lexicographic comparison in SQL matches chronological
//! order. Nothing uses SQLite's `datetime('now')`, which produces a
//! different format.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// The current time in the stored format.
pub fn now() -> String {
    format(Utc::now())
}

/// Format a datetime in the stored format.
pub fn format(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The stored form of `now - days`.
pub fn days_ago(days: i64) -> String {
    format(Utc::now() - Duration::days(days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_is_sortable() {
        let earlier = format(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap());
        let later = format(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 1).unwrap());
        assert!(earlier < later);
        assert!(earlier.ends_with('Z'));
    }

    #[test]
    fn test_days_ago_precedes_now() {
        assert!(days_ago(90) < now());
    }
}
