//! The Total Grind Index (TGI).
//!
//! TGI blends completed actions, streak length and raw practice time into one score. Completed
//! actions weigh the most, consistency comes second and duration last.

use std::time::Duration;

use crate::num::AsF64;

/// TGI per completed action.
pub const ACTION_WEIGHT: f64 = 3.0;

/// TGI per day of the current streak.
pub const STREAK_WEIGHT: f64 = 5.0;

/// TGI per minute of practice.
pub const MINUTE_WEIGHT: f64 = 0.2;

/// TGI per minute of a single grind session.
pub const SESSION_TGI_PER_MINUTE: f64 = 1.0;

/// The undecayed score.
pub fn raw(actions: u64, streak_days: u32, duration_minutes: f64) -> f64 {
    actions.as_f64() * ACTION_WEIGHT
        + streak_days.as_f64() * STREAK_WEIGHT
        + duration_minutes * MINUTE_WEIGHT
}

/// The standing score, discounted by `decay` (see [`crate::decay::multiplier()`]).
pub fn compute(actions: u64, streak_days: u32, duration_minutes: f64, decay: f64) -> f64 {
    raw(actions, streak_days, duration_minutes) * decay
}

/// TGI earned by a single grind session lasting `elapsed`.
///
/// Sessions are never decayed; decay only ever discounts the standing score.
pub fn for_session(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() / 60.0 * SESSION_TGI_PER_MINUTE
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    #[test]
    fn weighted_sum() {
        let tgi = compute(10, 5, 120.0, 1.0);

        assert!((tgi - 79.0).abs() < 1e-9, "{tgi}");
    }

    #[test]
    fn decay_scales_the_whole_score() {
        let tgi = compute(10, 5, 120.0, 0.8);

        assert!((tgi - 63.2).abs() < 1e-9, "{tgi}");
    }

    #[test]
    fn nothing_done_is_zero() {
        assert_eq!(compute(0, 0, 0.0, 1.0), 0.0);
    }

    #[test]
    fn non_decreasing_in_every_input() {
        let mut rng = rand::thread_rng();

        for _ in 0..1000 {
            let actions = rng.gen_range(0..10_000_u64);
            let streak = rng.gen_range(0..1_000_u32);
            let minutes = rng.gen_range(0.0..100_000.0);
            let decay = rng.gen_range(0.8..=1.0);
            let base = compute(actions, streak, minutes, decay);

            assert!(compute(actions + 1, streak, minutes, decay) >= base, "actions");
            assert!(compute(actions, streak + 1, minutes, decay) >= base, "streak");
            assert!(compute(actions, streak, minutes + 1.0, decay) >= base, "minutes");
        }
    }

    #[test]
    fn one_point_per_session_minute() {
        assert_eq!(for_session(Duration::ZERO), 0.0);
        assert_eq!(for_session(Duration::from_secs(60)), 1.0);
        assert_eq!(for_session(Duration::from_secs(90)), 1.5);
        assert_eq!(for_session(Duration::from_secs(3600)), 60.0);
    }
}
