//! Inactivity decay ("rust").
//!
//! Standing scores are discounted once a user has not done anything for a while. The penalty
//! starts after a one-day grace window, grows in daily steps and bottoms out at
//! [`FLOOR`], so decay can never wipe out a score entirely.

use crate::Timestamp;

/// Hours of inactivity that go unpunished.
pub const GRACE_HOURS: f64 = 24.0;

/// How much of the multiplier is lost for every started day past the grace window.
pub const STEP_PER_DAY: f64 = 0.05;

/// The lowest multiplier decay can produce.
pub const FLOOR: f64 = 0.8;

/// Hours of inactivity after which the multiplier sits at [`FLOOR`].
pub const FULL_DECAY_HOURS: f64 = 72.0;

/// Hours past the grace window over which the grinding view's rust level climbs to 1.
pub const RUST_RAMP_HOURS: f64 = 48.0;

/// Calculates the decay multiplier for a user last active at `last_activity`.
///
/// Users without any recorded activity are not penalized.
pub fn multiplier(last_activity: Option<Timestamp>, now: Timestamp) -> f64 {
    match last_activity {
        None => 1.0,
        Some(last_activity) => multiplier_after(now.hours_since(last_activity)),
    }
}

/// Calculates the decay multiplier after `hours_since` hours of inactivity.
pub fn multiplier_after(hours_since: f64) -> f64 {
    if hours_since.is_nan() || hours_since < GRACE_HOURS {
        return 1.0;
    }

    if hours_since >= FULL_DECAY_HOURS {
        return FLOOR;
    }

    let days_over = ((hours_since - GRACE_HOURS) / 24.0).floor() + 1.0;

    f64::max(FLOOR, 1.0 - days_over * STEP_PER_DAY)
}

/// Whether a multiplier carries any penalty.
pub fn is_rusting(multiplier: f64) -> bool {
    multiplier < 1.0
}

/// How rusty the blade looks in the grinding view, from `0.0` (clean) to `1.0`.
///
/// This is purely visual and ramps linearly over [`RUST_RAMP_HOURS`] once the grace window has
/// passed; it never affects any score.
pub fn rust_level(last_slashed_at: Option<Timestamp>, now: Timestamp) -> f64 {
    let Some(last_slashed_at) = last_slashed_at else {
        return 0.0;
    };

    let hours = now.hours_since(last_slashed_at);

    if hours <= GRACE_HOURS {
        return 0.0;
    }

    f64::min(1.0, (hours - GRACE_HOURS) / RUST_RAMP_HOURS)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rand::Rng;

    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    fn after_hours(hours: u32) -> (Timestamp, Timestamp) {
        let last = Timestamp::from_unix_ms(1_700_000_000_000);

        (last, last + HOUR * hours)
    }

    #[test]
    fn never_active_is_not_penalized() {
        assert_eq!(multiplier(None, Timestamp::from_unix_ms(1_700_000_000_000)), 1.0);
    }

    #[test]
    fn grace_window() {
        for hours in 0..24 {
            let (last, now) = after_hours(hours);
            assert_eq!(multiplier(Some(last), now), 1.0, "{hours}h");
        }

        assert_eq!(multiplier_after(23.999), 1.0);
    }

    #[test]
    fn daily_steps() {
        assert_eq!(multiplier_after(24.0), 1.0 - STEP_PER_DAY);
        assert_eq!(multiplier_after(47.9), 1.0 - STEP_PER_DAY);
        assert_eq!(multiplier_after(48.0), 1.0 - 2.0 * STEP_PER_DAY);
        assert_eq!(multiplier_after(71.9), 1.0 - 2.0 * STEP_PER_DAY);
    }

    #[test]
    fn floor_after_three_days() {
        for hours in [72, 73, 96, 24 * 365] {
            let (last, now) = after_hours(hours);
            assert_eq!(multiplier(Some(last), now), 0.8, "{hours}h");
        }
    }

    #[test]
    fn non_increasing_over_time() {
        let mut rng = rand::thread_rng();
        let mut hours = (0..500)
            .map(|_| rng.gen_range(0.0..200.0))
            .collect::<Vec<f64>>();

        hours.sort_by(f64::total_cmp);

        for pair in hours.windows(2) {
            let [earlier, later] = pair else { unreachable!() };
            assert!(
                multiplier_after(*later) <= multiplier_after(*earlier),
                "decay increased between {earlier}h and {later}h",
            );
        }
    }

    #[test]
    fn always_within_bounds() {
        let mut rng = rand::thread_rng();

        for _ in 0..1000 {
            let value = multiplier_after(rng.gen_range(0.0..10_000.0));
            assert!(value > 0.0 && value <= 1.0, "{value} out of bounds");
        }
    }

    #[test]
    fn clock_skew_counts_as_fresh() {
        let (last, now) = after_hours(5);

        assert_eq!(multiplier(Some(now), last), 1.0);
    }

    #[test]
    fn pure() {
        let (last, now) = after_hours(50);

        assert_eq!(
            multiplier(Some(last), now).to_bits(),
            multiplier(Some(last), now).to_bits(),
        );
    }

    #[test]
    fn rust_level_ramp() {
        let now = Timestamp::from_unix_ms(1_700_000_000_000);

        assert_eq!(rust_level(None, now), 0.0);

        let (last, now) = after_hours(24);
        assert_eq!(rust_level(Some(last), now), 0.0);

        let (last, now) = after_hours(48);
        assert_eq!(rust_level(Some(last), now), 0.5);

        let (last, now) = after_hours(100);
        assert_eq!(rust_level(Some(last), now), 1.0);
    }
}
