//! The hours-based percentile model.
//!
//! Total practice time is split into four phases, each with its own curve:
//!
//! | phase       | hours          | percentile                          |
//! |-------------|----------------|-------------------------------------|
//! | Onboarding  | `[0, 20)`      | `100 - h` (linear, 100% -> 80%)     |
//! | Selection   | `[20, 100)`    | `80 * (5/80)^p` (80% -> 5%)         |
//! | Habituation | `[100, 1000)`  | `5 - 4 * sqrt(p)` (5% -> 1%)        |
//! | Mastery     | `[1000, ∞)`    | `1000 / h`                          |
//!
//! where `p` is the normalized progress through the phase. The result is clamped to
//! <code>[[MIN_PERCENTILE], 100]</code>.

use serde::Serialize;

use crate::num::{self, AsF64};
use crate::rank;

/// The smallest percentile the model ever reports.
pub const MIN_PERCENTILE: f64 = 0.00001;

/// People overtaken per second during [`Phase::Mastery`].
///
/// The curve flattens out so much in that phase that its derivative is mostly noise.
pub const MASTERY_TRICKLE: f64 = 100.0;

const SELECTION_START: f64 = 20.0;
const HABITUATION_START: f64 = 100.0;
const MASTERY_START: f64 = 1_000.0;

/// One second, in hours.
const ONE_SECOND: f64 = 1.0 / 3600.0;

/// A stretch of practice time with its own percentile curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// `[0, 20)` hours.
    Onboarding,
    /// `[20, 100)` hours.
    Selection,
    /// `[100, 1000)` hours.
    Habituation,
    /// 1000 hours and beyond.
    Mastery,
}

/// How fast a rank moves within a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Velocity {
    /// The rank barely moves.
    Low,
    /// Steady movement.
    Normal,
    /// The rank moves quickly.
    High,
}

/// The result of evaluating the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Estimate {
    /// The share of people still ahead, in `[0.00001, 100]`.
    pub percentile: f64,
    /// The phase the estimate was made in.
    pub phase: Phase,

    /// Rank within the population the estimate was made for.
    pub rank: u64,

    /// How many people are overtaken per second of further practice.
    pub speed_per_second: f64,
}

impl Phase {
    /// Every phase, in order.
    pub const ALL: [Self; 4] = [Self::Onboarding, Self::Selection, Self::Habituation, Self::Mastery];

    /// The phase someone with `hours` of practice is in.
    pub fn for_hours(hours: f64) -> Self {
        if hours < SELECTION_START {
            Self::Onboarding
        } else if hours < HABITUATION_START {
            Self::Selection
        } else if hours < MASTERY_START {
            Self::Habituation
        } else {
            Self::Mastery
        }
    }

    /// The hour range covered by this phase; `None` as the upper bound means "unbounded".
    pub const fn hours(&self) -> (f64, Option<f64>) {
        match self {
            Self::Onboarding => (0.0, Some(SELECTION_START)),
            Self::Selection => (SELECTION_START, Some(HABITUATION_START)),
            Self::Habituation => (HABITUATION_START, Some(MASTERY_START)),
            Self::Mastery => (MASTERY_START, None),
        }
    }

    /// Short code (`P1` to `P4`).
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Onboarding => "P1",
            Self::Selection => "P2",
            Self::Habituation => "P3",
            Self::Mastery => "P4",
        }
    }

    /// Human-readable name.
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Onboarding => "Onboarding",
            Self::Selection => "Selection",
            Self::Habituation => "Habituation",
            Self::Mastery => "Mastery",
        }
    }

    /// How fast ranks move during this phase.
    pub const fn velocity(&self) -> Velocity {
        match self {
            Self::Onboarding | Self::Mastery => Velocity::Low,
            Self::Selection => Velocity::High,
            Self::Habituation => Velocity::Normal,
        }
    }

    /// Evaluates this phase's curve at `hours`, without clamping.
    ///
    /// Evaluating a phase outside of its own hour range just extends its curve.
    pub fn curve(&self, hours: f64) -> f64 {
        match self {
            Self::Onboarding => 100.0 - hours,
            Self::Selection => {
                let progress = (hours - SELECTION_START) / (HABITUATION_START - SELECTION_START);
                80.0 * (5.0_f64 / 80.0).powf(progress)
            },
            Self::Habituation => {
                let progress = (hours - HABITUATION_START) / (MASTERY_START - HABITUATION_START);
                5.0 - 4.0 * progress.max(0.0).sqrt()
            },
            Self::Mastery => MASTERY_START / hours,
        }
    }
}

impl Estimate {
    /// "One in N people": how rare this percentile is.
    pub fn rank_ratio(&self) -> u64 {
        num::floor_u64(100.0 / self.percentile).max(1)
    }

    /// [`speed_per_second`](Self::speed_per_second) as a whole number of people, at least 1.
    pub fn overtaking_per_second(&self) -> u64 {
        num::floor_u64(self.speed_per_second).max(1)
    }
}

/// Calculates the percentile and phase for `hours` of total practice.
pub fn percentile(hours: f64) -> (f64, Phase) {
    let hours = sanitize(hours);
    let phase = Phase::for_hours(hours);

    (phase.curve(hours).clamp(MIN_PERCENTILE, 100.0), phase)
}

/// Evaluates the model for `hours` of total practice within a population of `population`
/// people.
pub fn from_hours(hours: f64, population: u64) -> Estimate {
    let hours = sanitize(hours);
    let (percentile, phase) = percentile(hours);
    let rank = rank::from_percentile(percentile, population);

    let speed_per_second = match phase {
        Phase::Mastery => MASTERY_TRICKLE,
        phase => {
            let delta = phase.curve(hours) - phase.curve(hours + ONE_SECOND);
            delta / 100.0 * population.as_f64()
        },
    };

    Estimate { percentile, phase, rank, speed_per_second }
}

/// Like [`from_hours()`], but takes the practice time in seconds.
pub fn from_seconds(seconds: u64, population: u64) -> Estimate {
    from_hours(seconds.as_f64() / 3600.0, population)
}

fn sanitize(hours: f64) -> f64 {
    if hours.is_nan() { 0.0 } else { hours.max(0.0) }
}
