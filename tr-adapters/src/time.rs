//! Timing-export time cells
//!
//! Exports write session time as a pandas-style timedelta,
//! `"0 days 00:56:26.961000"`, or as plain seconds. Only the clock part is
//! used; the day count is ignored.

use chrono::{NaiveTime, Timelike};

const CLOCK_FORMAT: &str = "%H:%M:%S%.f";

/// Parse a time cell into seconds. `None` when the cell has no recognisable
/// clock or number in it.
pub fn parse_session_time(raw: &str) -> Option<f64> {
    let clock = raw.split_whitespace().last()?;

    if let Ok(t) = NaiveTime::parse_from_str(clock, CLOCK_FORMAT) {
        let whole = t.hour() * 3600 + t.minute() * 60 + t.second();
        return Some(whole as f64 + t.nanosecond() as f64 / 1e9);
    }

    reduce_clock_components(clock)
}

/// Fold `a:b:c` left to right as `acc * 60 + part`. Handles `MM:SS.fff`,
/// bare seconds and hour counts past 23. A fold that overflows is `None`.
fn reduce_clock_components(clock: &str) -> Option<f64> {
    clock
        .split(':')
        .try_fold(0.0_f64, |acc, part| {
            let value: f64 = part.parse().ok()?;
            Some(acc * 60.0 + value)
        })
        .filter(|seconds| seconds.is_finite())
}

/// Format seconds the way timing exports do, e.g. `"0 days 00:56:26.961"`.
/// Negative and non-finite values format as zero.
pub fn format_session_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let days = (seconds / 86_400.0).floor();
    let in_day = seconds - days * 86_400.0;
    let whole = in_day.floor();
    let nanos = ((in_day - whole) * 1e9).round().min(999_999_999.0);

    let clock = NaiveTime::from_num_seconds_from_midnight_opt(whole as u32, nanos as u32)
        .map(|t| t.format("%H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| "00:00:00.000".to_string());
    format!("{} days {}", days as u64, clock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_timedelta_string() {
        let t = parse_session_time("0 days 00:56:26.961").unwrap();
        assert_relative_eq!(t, 3386.961, epsilon = 1e-9);
    }

    #[test]
    fn test_parse_timedelta_with_microseconds() {
        let t = parse_session_time("0 days 01:02:03.456000").unwrap();
        assert_relative_eq!(t, 3723.456, epsilon = 1e-9);
    }

    #[test]
    fn test_days_are_ignored() {
        let t = parse_session_time("1 days 00:00:05.000").unwrap();
        assert_relative_eq!(t, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_parse_plain_seconds() {
        assert_eq!(parse_session_time("42.5"), Some(42.5));
        assert_eq!(parse_session_time("  7 "), Some(7.0));
    }

    #[test]
    fn test_parse_minutes_and_seconds() {
        let t = parse_session_time("56:26.961").unwrap();
        assert_relative_eq!(t, 3386.961, epsilon = 1e-9);
    }

    #[test]
    fn test_parse_hours_past_a_day() {
        let t = parse_session_time("25:00:00").unwrap();
        assert_eq!(t, 90_000.0);
    }

    #[test]
    fn test_malformed_time_is_none() {
        assert_eq!(parse_session_time(""), None);
        assert_eq!(parse_session_time("0 days"), None);
        assert_eq!(parse_session_time("abc"), None);
        assert_eq!(parse_session_time("00:xx:10"), None);
        assert_eq!(parse_session_time("NaN"), None);
        assert_eq!(parse_session_time("inf"), None);
    }

    #[test]
    fn test_overflowing_clock_is_none() {
        assert_eq!(parse_session_time("1e307:00"), None);
        assert_eq!(parse_session_time("1e308:00:00"), None);
        assert_eq!(parse_session_time("1e300"), Some(1e300));
    }

    #[test]
    fn test_format_session_time() {
        assert_eq!(format_session_time(3386.961), "0 days 00:56:26.961");
        assert_eq!(format_session_time(0.0), "0 days 00:00:00.000");
        assert_eq!(format_session_time(-5.0), "0 days 00:00:00.000");
        assert_eq!(format_session_time(86_401.5), "1 days 00:00:01.500");
    }

    #[test]
    fn test_format_then_parse_is_stable() {
        for secs in [0.25, 61.5, 3599.999, 4000.125] {
            let parsed = parse_session_time(&format_session_time(secs)).unwrap();
            assert_relative_eq!(parsed, secs, epsilon = 1e-6);
        }
    }
}
