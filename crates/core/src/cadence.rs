//! Check-in cadence computation.
//!
//! Each group is pinged `frequency` times per 7-day period, either on a
//! fixed grid or with exponentially distributed gaps (a Poisson process,
//! so prompts stay unpredictable). All sampling goes through the
//! [`UniformSource`] trait so tests can pin the draws and assert the
//! inverse-transform formula exactly.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Hours in the 7-day cadence period.
const PERIOD_HOURS: f64 = 7.0 * 24.0;

/// Shortest allowed gap between pings. Also the fixed bootstrap delay.
const MIN_INTERVAL_HOURS: f64 = 1.0;

/// Bootstrap delay upper bound for random-mode groups.
const BOOTSTRAP_MAX_HOURS: f64 = 5.0;

// ---------------------------------------------------------------------------
// IntervalMode
// ---------------------------------------------------------------------------

/// How ping intervals are distributed over the cadence period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalMode {
    /// Deterministic spacing: `168h / frequency` between pings.
    Fixed,
    /// Exponential inter-arrival times with the same mean.
    Random,
}

impl IntervalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalMode::Fixed => "fixed",
            IntervalMode::Random => "random",
        }
    }
}

impl fmt::Display for IntervalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntervalMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(IntervalMode::Fixed),
            "random" => Ok(IntervalMode::Random),
            other => Err(CoreError::Validation(format!(
                "Unknown interval mode: \"{other}\""
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// UniformSource
// ---------------------------------------------------------------------------

/// Source of uniform draws in `[0, 1)`.
///
/// Production uses [`ThreadRngUniform`]; tests supply fixed values to make
/// the sampled intervals deterministic.
pub trait UniformSource {
    fn sample(&mut self) -> f64;
}

/// Thread-local RNG source used outside tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngUniform;

impl UniformSource for ThreadRngUniform {
    fn sample(&mut self) -> f64 {
        rand::rng().random::<f64>()
    }
}

// ---------------------------------------------------------------------------
// Interval computation
// ---------------------------------------------------------------------------

/// Next ping time for a group that already has a schedule.
///
/// Fixed mode advances by exactly the mean interval. Random mode samples
/// an exponential inter-arrival time via inverse-transform
/// (`-ln(1-u) * mean`), floored at one hour and capped at twice the mean
/// so a group is neither hammered nor silently skipped for an unbounded
/// stretch.
pub fn next_ping_at(
    frequency: i32,
    mode: IntervalMode,
    now: Timestamp,
    rng: &mut impl UniformSource,
) -> Timestamp {
    let mean_hours = PERIOD_HOURS / f64::from(frequency.max(1));
    let interval_hours = match mode {
        IntervalMode::Fixed => mean_hours,
        IntervalMode::Random => {
            let u = rng.sample();
            let raw = -(1.0 - u).ln() * mean_hours;
            let cap = (2.0 * mean_hours).max(MIN_INTERVAL_HOURS);
            raw.clamp(MIN_INTERVAL_HOURS, cap)
        }
    };
    now + hours(interval_hours)
}

/// First ping time for a group that has never been scheduled.
///
/// A short bootstrap delay so a brand-new group gets its first prompt
/// soon instead of waiting out a full cadence interval: uniform within
/// 1-5 hours in random mode, exactly one hour in fixed mode.
pub fn bootstrap_ping_at(
    mode: IntervalMode,
    now: Timestamp,
    rng: &mut impl UniformSource,
) -> Timestamp {
    let delay_hours = match mode {
        IntervalMode::Fixed => MIN_INTERVAL_HOURS,
        IntervalMode::Random => {
            MIN_INTERVAL_HOURS + rng.sample() * (BOOTSTRAP_MAX_HOURS - MIN_INTERVAL_HOURS)
        }
    };
    now + hours(delay_hours)
}

fn hours(value: f64) -> Duration {
    Duration::seconds((value * 3600.0).round() as i64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    /// Replays a fixed sequence of draws.
    struct FixedUniform(Vec<f64>);

    impl UniformSource for FixedUniform {
        fn sample(&mut self) -> f64 {
            self.0.remove(0)
        }
    }

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap()
    }

    // -- interval mode parsing ------------------------------------------------

    #[test]
    fn interval_mode_round_trips_through_str() {
        assert_eq!("fixed".parse::<IntervalMode>().unwrap(), IntervalMode::Fixed);
        assert_eq!(
            "random".parse::<IntervalMode>().unwrap(),
            IntervalMode::Random
        );
        assert_eq!(IntervalMode::Fixed.as_str(), "fixed");
        assert_eq!(IntervalMode::Random.as_str(), "random");
    }

    #[test]
    fn unknown_interval_mode_rejected() {
        assert!("sometimes".parse::<IntervalMode>().is_err());
    }

    // -- fixed mode -----------------------------------------------------------

    #[test]
    fn fixed_daily_frequency_advances_one_day() {
        let mut rng = FixedUniform(vec![]);
        let next = next_ping_at(7, IntervalMode::Fixed, t0(), &mut rng);
        assert_eq!(next, t0() + Duration::hours(24));
    }

    #[test]
    fn fixed_weekly_frequency_advances_one_week() {
        let mut rng = FixedUniform(vec![]);
        let next = next_ping_at(1, IntervalMode::Fixed, t0(), &mut rng);
        assert_eq!(next, t0() + Duration::hours(168));
    }

    // -- random mode ----------------------------------------------------------

    #[test]
    fn random_interval_matches_inverse_transform() {
        // u = 0.5, mean = 24h: -ln(0.5) * 24 = 16.6355... hours.
        let mut rng = FixedUniform(vec![0.5]);
        let next = next_ping_at(7, IntervalMode::Random, t0(), &mut rng);
        let expected_secs = (-(0.5f64).ln() * 24.0 * 3600.0).round() as i64;
        assert_eq!(next, t0() + Duration::seconds(expected_secs));
    }

    #[test]
    fn random_interval_floors_at_one_hour() {
        // u near zero collapses the raw interval toward zero.
        let mut rng = FixedUniform(vec![1e-9]);
        let next = next_ping_at(7, IntervalMode::Random, t0(), &mut rng);
        assert_eq!(next, t0() + Duration::hours(1));
    }

    #[test]
    fn random_interval_caps_at_twice_the_mean() {
        // u near one blows the raw interval up; the cap bounds the tail.
        let mut rng = FixedUniform(vec![1.0 - 1e-12]);
        let next = next_ping_at(7, IntervalMode::Random, t0(), &mut rng);
        assert_eq!(next, t0() + Duration::hours(48));
    }

    #[test]
    fn random_interval_stays_within_bounds_for_all_draws() {
        for freq in [1, 3, 7, 14] {
            let mean_hours = 168.0 / f64::from(freq);
            for u in [0.0, 0.01, 0.25, 0.5, 0.75, 0.99, 0.999_999] {
                let mut rng = FixedUniform(vec![u]);
                let next = next_ping_at(freq, IntervalMode::Random, t0(), &mut rng);
                let gap = next - t0();
                assert!(gap >= Duration::hours(1), "freq={freq} u={u}");
                assert!(
                    gap <= Duration::seconds((2.0 * mean_hours * 3600.0).round() as i64),
                    "freq={freq} u={u}"
                );
            }
        }
    }

    #[test]
    fn zero_frequency_is_clamped_rather_than_dividing_by_zero() {
        let mut rng = FixedUniform(vec![]);
        let next = next_ping_at(0, IntervalMode::Fixed, t0(), &mut rng);
        assert_eq!(next, t0() + Duration::hours(168));
    }

    // -- bootstrap ------------------------------------------------------------

    #[test]
    fn bootstrap_fixed_is_exactly_one_hour() {
        let mut rng = FixedUniform(vec![]);
        let first = bootstrap_ping_at(IntervalMode::Fixed, t0(), &mut rng);
        assert_eq!(first, t0() + Duration::hours(1));
    }

    #[test]
    fn bootstrap_random_spans_one_to_five_hours() {
        let mut low = FixedUniform(vec![0.0]);
        assert_eq!(
            bootstrap_ping_at(IntervalMode::Random, t0(), &mut low),
            t0() + Duration::hours(1)
        );

        let mut high = FixedUniform(vec![1.0]);
        assert_eq!(
            bootstrap_ping_at(IntervalMode::Random, t0(), &mut high),
            t0() + Duration::hours(5)
        );

        let mut mid = FixedUniform(vec![0.5]);
        assert_eq!(
            bootstrap_ping_at(IntervalMode::Random, t0(), &mut mid),
            t0() + Duration::hours(3)
        );
    }

    #[test]
    fn bootstrap_is_always_in_the_future() {
        for u in [0.0, 0.5, 0.999] {
            let mut rng = FixedUniform(vec![u]);
            assert!(bootstrap_ping_at(IntervalMode::Random, t0(), &mut rng) > t0());
        }
        let mut rng = FixedUniform(vec![]);
        assert!(bootstrap_ping_at(IntervalMode::Fixed, t0(), &mut rng) > t0());
    }

    // -- production source ----------------------------------------------------

    #[test]
    fn thread_rng_samples_are_in_unit_range() {
        let mut rng = ThreadRngUniform;
        for _ in 0..100 {
            let u = rng.sample();
            assert!((0.0..1.0).contains(&u));
        }
    }
}
