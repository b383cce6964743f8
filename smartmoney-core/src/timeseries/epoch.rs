use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Values above this are read as milliseconds (1973-03-03 in ms, year 5138 in seconds).
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Normalize a numeric provider timestamp to unix seconds.
///
/// Epoch milliseconds are detected by magnitude and truncated to seconds.
#[must_use]
pub const fn epoch_from_number(raw: i64) -> i64 {
    if raw > MILLIS_THRESHOLD {
        raw / 1_000
    } else {
        raw
    }
}

/// Parse a provider timestamp string to unix seconds (UTC).
///
/// Accepts, in order: integer epoch seconds or milliseconds, RFC 3339,
/// `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD HH:MM` and bare `YYYY-MM-DD` (midnight).
/// Naive datetimes are taken as UTC. Returns `None` when nothing matches.
#[must_use]
pub fn epoch_from_str(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<i64>() {
        return Some(epoch_from_number(n));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_are_scaled_down() {
        assert_eq!(epoch_from_number(1_700_000_000_000), 1_700_000_000);
        assert_eq!(epoch_from_number(1_700_000_000), 1_700_000_000);
        assert_eq!(epoch_from_str("1700000000123"), Some(1_700_000_000));
    }

    #[test]
    fn datetime_strings_are_utc() {
        assert_eq!(epoch_from_str("2023-11-14 22:13:20"), Some(1_700_000_000));
        assert_eq!(epoch_from_str("2023-11-14T22:13:20Z"), Some(1_700_000_000));
        assert_eq!(epoch_from_str("2023-11-14 22:13"), Some(1_699_999_980));
        assert_eq!(epoch_from_str("2024-01-01"), Some(1_704_067_200));
        assert_eq!(epoch_from_str("yesterday"), None);
        assert_eq!(epoch_from_str(""), None);
    }
}
