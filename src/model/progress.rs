// src/model/progress.rs

//! Progress and parameter math for a running task.
//!
//! All arithmetic runs on `u128` nanoseconds / `i128` values so that no
//! combination of inputs can overflow, and every result is clamped to its
//! valid range.

use std::time::Duration;

use crate::types::Ramp;

/// `floor(100 * elapsed / duration)`, clamped to `[0, 100]`.
///
/// A zero duration counts as already complete.
pub fn progress_percent(elapsed: Duration, duration: Duration) -> u8 {
    let total = duration.as_nanos();
    if total == 0 {
        return 100;
    }
    let pct = elapsed.as_nanos().saturating_mul(100) / total;
    pct.min(100) as u8
}

/// Time left for a task of `duration` that reported `progress` percent.
pub fn remaining(progress: u8, duration: Duration) -> Duration {
    let total = duration.as_nanos();
    let done = total * u128::from(progress.min(100)) / 100;
    Duration::from_nanos(u64::try_from(total - done).unwrap_or(u64::MAX))
}

/// Current value of a readout moving from `baseline` toward `target`.
///
/// With [`Ramp::Step`] the target is reached immediately; with
/// [`Ramp::Linear`] the value moves proportionally to `elapsed / duration`.
/// The result always lies between `baseline` and `target`.
pub fn interpolate(
    baseline: u32,
    target: u32,
    elapsed: Duration,
    duration: Duration,
    ramp: Ramp,
) -> u32 {
    match ramp {
        Ramp::Step => target,
        Ramp::Linear => {
            let total = duration.as_nanos();
            if total == 0 {
                return target;
            }
            let done = elapsed.as_nanos().min(total);
            let delta = i128::from(target) - i128::from(baseline);
            let value = i128::from(baseline) + delta * done as i128 / total as i128;
            value.clamp(0, i128::from(u32::MAX)) as u32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn percent_floors_and_clamps() {
        assert_eq!(progress_percent(ms(0), ms(3000)), 0);
        assert_eq!(progress_percent(ms(1000), ms(3000)), 33);
        assert_eq!(progress_percent(ms(2999), ms(3000)), 99);
        assert_eq!(progress_percent(ms(3000), ms(3000)), 100);
        assert_eq!(progress_percent(ms(9000), ms(3000)), 100);
        assert_eq!(progress_percent(ms(5), Duration::ZERO), 100);
    }

    #[test]
    fn remaining_time_matches_progress() {
        assert_eq!(remaining(0, ms(10_000)), ms(10_000));
        assert_eq!(remaining(25, ms(10_000)), ms(7_500));
        assert_eq!(remaining(100, ms(10_000)), Duration::ZERO);
        assert_eq!(remaining(250, ms(10_000)), Duration::ZERO);
    }

    #[test]
    fn linear_ramp_moves_toward_target() {
        let d = ms(10_000);
        assert_eq!(interpolate(20, 100, ms(0), d, Ramp::Linear), 20);
        assert_eq!(interpolate(20, 100, ms(5_000), d, Ramp::Linear), 60);
        assert_eq!(interpolate(20, 100, ms(10_000), d, Ramp::Linear), 100);
        // Cooling toward a target below the baseline.
        assert_eq!(interpolate(20, 4, ms(5_000), d, Ramp::Linear), 12);
    }

    #[test]
    fn step_ramp_snaps() {
        assert_eq!(interpolate(0, 8, ms(100), ms(10_000), Ramp::Step), 8);
    }

    proptest! {
        #[test]
        fn percent_is_monotonic(a in 0u64..1_000_000, b in 0u64..1_000_000, d in 1u64..1_000_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let p_lo = progress_percent(ms(lo), ms(d));
            let p_hi = progress_percent(ms(hi), ms(d));
            prop_assert!(p_lo <= p_hi);
            prop_assert!(p_hi <= 100);
        }

        #[test]
        fn interpolation_stays_in_range(
            baseline in any::<u32>(),
            target in any::<u32>(),
            e in any::<u64>(),
            d in 1u64..u64::MAX,
        ) {
            let v = interpolate(baseline, target, Duration::from_nanos(e), Duration::from_nanos(d), Ramp::Linear);
            prop_assert!(v >= baseline.min(target) && v <= baseline.max(target));
        }
    }
}
