//! The level ladder, based on total practice time.

use std::fmt;

use serde::Serialize;

use crate::num::{self, AsF64};

const SECONDS_PER_HOUR: u64 = 3600;

/// A title earned by total practice time; see [`Level::hours()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Level {
    /// 0 hours.
    Beginner,
    /// 100 hours.
    Amateur,
    /// 500 hours.
    Intermediate,
    /// 1,000 hours.
    Advanced,
    /// 2,500 hours.
    Expert,
    /// 5,000 hours.
    Master,
    /// 7,500 hours.
    Legend,
}

/// How far someone has come within their current level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LevelProgress {
    /// The level already reached.
    pub current: Level,

    /// [`None`] past the last level.
    pub next: Option<Level>,
    /// The level after [`next`](Self::next).
    pub next_next: Option<Level>,

    /// Progress towards the next threshold, in `[0, 100]`.
    pub percentage: f64,
    /// Hours of practice left until the next threshold, rounded up.
    pub hours_to_next: u32,

    /// Hours of practice left until [`next_next`](Self::next_next), rounded up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_to_next_next: Option<u32>,
}

impl Level {
    /// Every level, from lowest to highest.
    pub const ALL: [Self; 7] = [
        Self::Beginner,
        Self::Amateur,
        Self::Intermediate,
        Self::Advanced,
        Self::Expert,
        Self::Master,
        Self::Legend,
    ];

    /// Hours of practice required to reach this level.
    pub const fn hours(&self) -> u64 {
        match self {
            Self::Beginner => 0,
            Self::Amateur => 100,
            Self::Intermediate => 500,
            Self::Advanced => 1_000,
            Self::Expert => 2_500,
            Self::Master => 5_000,
            Self::Legend => 7_500,
        }
    }

    /// Like [`Level::hours()`], but in seconds.
    pub const fn threshold_secs(&self) -> u64 {
        self.hours() * SECONDS_PER_HOUR
    }

    /// The level reached after `seconds` of practice.
    pub fn for_seconds(seconds: u64) -> Self {
        Self::ALL
            .into_iter()
            .rev()
            .find(|level| seconds >= level.threshold_secs())
            .unwrap_or(Self::Beginner)
    }

    /// The level after this one, if any.
    pub fn next(&self) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level > self)
    }

    /// Progress within the level reached after `seconds` of practice.
    pub fn progress(seconds: u64) -> LevelProgress {
        let current = Self::for_seconds(seconds);
        let next = current.next();
        let next_next = next.and_then(|level| level.next());

        // past the last level, the goal is to double it
        let next_threshold = next
            .map_or_else(|| current.threshold_secs() * 2, |level| level.threshold_secs());

        let range = next_threshold.saturating_sub(current.threshold_secs());
        let done = seconds.saturating_sub(current.threshold_secs());
        let percentage = match range {
            0 => 100.0,
            range => (done.as_f64() * 100.0 / range.as_f64()).min(100.0),
        };

        let hours_until = |threshold: u64| {
            num::ceil_u32(threshold.saturating_sub(seconds).as_f64() / SECONDS_PER_HOUR.as_f64())
        };

        LevelProgress {
            current,
            next,
            next_next,
            percentage,
            hours_to_next: hours_until(next_threshold),
            hours_to_next_next: next_next.map(|level| hours_until(level.threshold_secs())),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, fmt)
    }
}

/// The level reached by going from `before` to `after` seconds of practice, if it changed.
pub fn level_up(before: u64, after: u64) -> Option<Level> {
    let old = Level::for_seconds(before);
    let new = Level::for_seconds(after);

    (new > old).then_some(new)
}
