//! Quiet-hours evaluation.
//!
//! A quiet window is an hour-of-day range in a user's local time during
//! which check-in prompts must not be sent. The window may wrap around
//! midnight (e.g. 23 -> 7). Both bounds must be present for the window to
//! be active; a missing bound disables quiet hours entirely.

use chrono::{TimeZone, Timelike};
use chrono_tz::Tz;

use crate::types::Timestamp;

/// Hour-of-day (0-23) for `now` in the named IANA timezone.
///
/// An unknown or malformed timezone name falls back to UTC. A bad
/// timezone string must never block sending.
pub fn local_hour(now: Timestamp, timezone: Option<&str>) -> u32 {
    match timezone.and_then(|name| name.parse::<Tz>().ok()) {
        Some(tz) => tz.from_utc_datetime(&now.naive_utc()).hour(),
        None => now.hour(),
    }
}

/// Whether `hour` falls inside the quiet window `[start, end)`.
///
/// A wraparound window (`start > end`) covers late evening and early
/// morning: `hour >= start || hour < end`. When `start == end` the window
/// is empty.
pub fn is_quiet_at_hour(hour: u32, start: i16, end: i16) -> bool {
    let hour = hour as i16;
    if start <= end {
        hour >= start && hour < end
    } else {
        hour >= start || hour < end
    }
}

/// Whether sending is currently suppressed for a user in `timezone`.
///
/// Pure in (`now`, bounds, timezone). Quiet hours are disabled unless
/// both bounds are present.
pub fn is_quiet_now(
    quiet_start: Option<i16>,
    quiet_end: Option<i16>,
    timezone: Option<&str>,
    now: Timestamp,
) -> bool {
    match (quiet_start, quiet_end) {
        (Some(start), Some(end)) => is_quiet_at_hour(local_hour(now, timezone), start, end),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    /// 2026-01-15 12:00 UTC: 07:00 in New York (EST), 21:00 in Tokyo.
    fn noon_utc() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()
    }

    // -- is_quiet_at_hour -----------------------------------------------------

    #[test]
    fn normal_window_suppresses_inside() {
        assert!(is_quiet_at_hour(12, 9, 17));
    }

    #[test]
    fn normal_window_allows_outside() {
        assert!(!is_quiet_at_hour(20, 9, 17));
    }

    #[test]
    fn normal_window_start_inclusive_end_exclusive() {
        assert!(is_quiet_at_hour(9, 9, 17));
        assert!(!is_quiet_at_hour(17, 9, 17));
    }

    #[test]
    fn wraparound_window_covers_night() {
        assert!(is_quiet_at_hour(23, 23, 7));
        assert!(is_quiet_at_hour(2, 23, 7));
    }

    #[test]
    fn wraparound_window_allows_daytime() {
        assert!(!is_quiet_at_hour(12, 23, 7));
        assert!(!is_quiet_at_hour(7, 23, 7));
    }

    #[test]
    fn equal_bounds_are_an_empty_window() {
        for hour in 0..24 {
            assert!(!is_quiet_at_hour(hour, 10, 10));
        }
    }

    // -- local_hour -----------------------------------------------------------

    #[test]
    fn local_hour_resolves_iana_names() {
        assert_eq!(local_hour(noon_utc(), Some("America/New_York")), 7);
        assert_eq!(local_hour(noon_utc(), Some("Asia/Tokyo")), 21);
    }

    #[test]
    fn local_hour_missing_timezone_is_utc() {
        assert_eq!(local_hour(noon_utc(), None), 12);
    }

    #[test]
    fn local_hour_invalid_timezone_falls_back_to_utc() {
        assert_eq!(local_hour(noon_utc(), Some("Not/AZone")), 12);
        assert_eq!(local_hour(noon_utc(), Some("")), 12);
    }

    // -- is_quiet_now ---------------------------------------------------------

    #[test]
    fn disabled_without_both_bounds() {
        assert!(!is_quiet_now(None, None, Some("Asia/Tokyo"), noon_utc()));
        assert!(!is_quiet_now(Some(0), None, Some("Asia/Tokyo"), noon_utc()));
        assert!(!is_quiet_now(None, Some(23), Some("Asia/Tokyo"), noon_utc()));
    }

    #[test]
    fn uses_the_member_timezone() {
        // 21:00 in Tokyo is inside a 20-8 window; 07:00 in New York is too.
        assert!(is_quiet_now(Some(20), Some(8), Some("Asia/Tokyo"), noon_utc()));
        assert!(is_quiet_now(
            Some(20),
            Some(8),
            Some("America/New_York"),
            noon_utc()
        ));
        // 12:00 UTC is not.
        assert!(!is_quiet_now(Some(20), Some(8), None, noon_utc()));
    }

    #[test]
    fn invalid_timezone_still_evaluates_in_utc() {
        // Never error out of a send decision over a bad timezone string.
        assert!(is_quiet_now(Some(9), Some(17), Some("Mars/Olympus"), noon_utc()));
        assert!(!is_quiet_now(Some(13), Some(17), Some("Mars/Olympus"), noon_utc()));
    }
}
