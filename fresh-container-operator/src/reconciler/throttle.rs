use chrono::{DateTime, Duration, Utc};
use fresh_container_base::consts::DEFAULT_CHECK_INTERVAL_MINUTES;

/// Minimum time between two completed checks of the same deployment.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CheckInterval(Duration);

impl CheckInterval {
    /// Builds the interval declared by a monitor; zero or negative minutes
    /// fall back to the default interval.
    #[must_use]
    pub fn from_minutes(minutes: i64) -> Self {
        let minutes = if minutes > 0 { minutes } else { DEFAULT_CHECK_INTERVAL_MINUTES };
        Self(Duration::try_minutes(minutes).unwrap_or(Duration::MAX))
    }

    #[must_use]
    pub const fn as_duration(self) -> Duration { self.0 }
}

impl Default for CheckInterval {
    fn default() -> Self { Self::from_minutes(DEFAULT_CHECK_INTERVAL_MINUTES) }
}

/// Tells whether a deployment last checked at `last_checked` must be skipped
/// at `now`.
///
/// A missing or unparsable timestamp never skips. A deadline beyond the
/// representable range is never reached.
#[must_use]
pub fn is_checked_recently(
    last_checked: Option<&str>,
    interval: CheckInterval,
    now: DateTime<Utc>,
) -> bool {
    let Some(last_checked) = last_checked else {
        return false;
    };

    let last_checked_time = match DateTime::parse_from_rfc3339(last_checked) {
        Ok(time) => time.with_timezone(&Utc),
        Err(err) => {
            tracing::error!(date = last_checked, "Cannot parse 'last checked date': {err}");
            return false;
        }
    };

    last_checked_time
        .checked_add_signed(interval.as_duration())
        .is_none_or(|next_check| now < next_check)
}

#[cfg(test)]
mod tests {
    use chrono::SecondsFormat;

    use super::*;

    fn stamp(time: DateTime<Utc>) -> String { time.to_rfc3339_opts(SecondsFormat::Secs, true) }

    #[test]
    fn test_interval_defaults() {
        assert_eq!(CheckInterval::from_minutes(0), CheckInterval::default());
        assert_eq!(CheckInterval::from_minutes(-5), CheckInterval::default());
        assert_eq!(CheckInterval::default().as_duration(), Duration::minutes(10));
        assert_eq!(CheckInterval::from_minutes(3).as_duration(), Duration::minutes(3));
    }

    #[test]
    fn test_never_checked() {
        assert!(!is_checked_recently(None, CheckInterval::default(), Utc::now()));
    }

    #[test]
    fn test_malformed_timestamp() {
        assert!(!is_checked_recently(Some("yesterday"), CheckInterval::default(), Utc::now()));
        assert!(!is_checked_recently(Some(""), CheckInterval::default(), Utc::now()));
    }

    #[test]
    fn test_checked_within_interval() {
        let now = Utc::now();
        let last_checked = stamp(now - Duration::minutes(3));
        assert!(is_checked_recently(Some(&last_checked), CheckInterval::from_minutes(10), now));
    }

    #[test]
    fn test_interval_elapsed() {
        let now = Utc::now();
        let last_checked = stamp(now - Duration::minutes(11));
        assert!(!is_checked_recently(Some(&last_checked), CheckInterval::from_minutes(10), now));
    }

    #[test]
    fn test_boundary_is_due() {
        let now: DateTime<Utc> = "2026-10-19T10:10:00Z".parse().unwrap();
        let interval = CheckInterval::from_minutes(10);
        assert!(!is_checked_recently(Some("2026-10-19T10:00:00Z"), interval, now));
        assert!(is_checked_recently(Some("2026-10-19T10:00:01Z"), interval, now));
    }

    #[test]
    fn test_huge_interval_keeps_skipping() {
        let now: DateTime<Utc> = "2026-10-19T10:05:00Z".parse().unwrap();
        for minutes in [200_000_000_000, i64::MAX] {
            let interval = CheckInterval::from_minutes(minutes);
            assert!(is_checked_recently(Some("2026-10-19T10:00:00Z"), interval, now), "{minutes}");
        }
    }

    #[test]
    fn test_offsets_and_fractions() {
        let now: DateTime<Utc> = "2026-10-19T10:05:00Z".parse().unwrap();
        let interval = CheckInterval::from_minutes(10);
        assert!(is_checked_recently(Some("2026-10-19T12:00:00+02:00"), interval, now));
        assert!(is_checked_recently(Some("2026-10-19T10:00:00.123456Z"), interval, now));
    }
}
