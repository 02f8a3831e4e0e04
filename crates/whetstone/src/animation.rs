//! Counting animations for displayed ranks.
//!
//! An [`Animation`] is a finite iterator over the integers shown while a number moves from one
//! value to another. It does not know anything about clocks; whoever drives it decides how
//! long to wait between frames (see [`Animation::frame_interval()`]), or samples it directly
//! with [`Animation::value_at()`].

use std::iter::FusedIterator;
use std::str::FromStr;
use std::time::Duration;
use std::{cmp, fmt};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::num::{self, AsF64};

/// Differences smaller than this are not animated.
pub const SNAP_THRESHOLD: u64 = 5;

/// The default time between two frames (~60fps).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// How an animation accelerates towards its target.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Easing {
    /// Constant speed; used for the per-second realtime ticker.
    #[default]
    Linear,

    /// Cubic ease-out; used when revealing the overview.
    EaseOut,

    /// Exponential ease-out; used when revealing the result of a grind session.
    EaseOutExpo,
}

/// Returned when parsing an unknown [`Easing`] name.
#[derive(Debug, Display, Error)]
#[display("unknown easing `{value}`")]
pub struct UnknownEasing {
    value: String,
}

/// A finite sequence of integers moving from one value towards another.
#[derive(Debug, Clone)]
pub struct Animation {
    from: u64,
    to: u64,
    easing: Easing,
    duration: Duration,
    frame_interval: Duration,

    /// The next frame to yield, starting at 1.
    frame: u32,
    frames: u32,
}

impl Easing {
    /// Every easing, in declaration order.
    pub const ALL: [Self; 3] = [Self::Linear, Self::EaseOut, Self::EaseOutExpo];

    /// Formats the easing in a standardized way that is consistent with configuration and CLI
    /// arguments.
    pub const fn api(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseOut => "ease-out",
            Self::EaseOutExpo => "ease-out-expo",
        }
    }

    /// How long an animation with this easing runs by default.
    pub const fn default_duration(&self) -> Duration {
        match self {
            Self::Linear => Duration::from_millis(1_000),
            Self::EaseOut => Duration::from_millis(1_500),
            Self::EaseOutExpo => Duration::from_millis(2_000),
        }
    }

    /// Maps linear progress in `[0, 1]` onto the eased progress in `[0, 1]`.
    pub fn apply(&self, progress: f64) -> f64 {
        let progress = if progress.is_nan() { 1.0 } else { progress.clamp(0.0, 1.0) };

        match self {
            Self::Linear => progress,
            Self::EaseOut => 1.0 - (1.0 - progress).powi(3),
            Self::EaseOutExpo if progress >= 1.0 => 1.0,
            Self::EaseOutExpo => 1.0 - 2.0_f64.powf(-10.0 * progress),
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(self.api())
    }
}

impl FromStr for Easing {
    type Err = UnknownEasing;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|easing| value.eq_ignore_ascii_case(easing.api()))
            .ok_or_else(|| UnknownEasing { value: value.to_owned() })
    }
}

impl Serialize for Easing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.api().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Easing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

impl Animation {
    /// Creates an animation from `from` to `to` running for the easing's
    /// [default duration](Easing::default_duration).
    pub fn new(from: u64, to: u64, easing: Easing) -> Self {
        Self::with_duration(from, to, easing, easing.default_duration())
    }

    /// Like [`Animation::new()`], but with an explicit total duration.
    pub fn with_duration(from: u64, to: u64, easing: Easing, duration: Duration) -> Self {
        let mut animation = Self {
            from,
            to,
            easing,
            duration,
            frame_interval: FRAME_INTERVAL,
            frame: 1,
            frames: 1,
        };

        animation.frames = animation.frame_count();
        animation
    }

    /// Changes the time between two frames.
    ///
    /// A zero interval is treated as a single frame.
    pub fn with_frame_interval(mut self, frame_interval: Duration) -> Self {
        self.frame_interval = frame_interval;
        self.frames = self.frame_count();
        self.frame = cmp::min(self.frame, self.frames.saturating_add(1));
        self
    }

    /// The time between two frames.
    pub const fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// The total duration of the animation.
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// The value of the last frame.
    pub const fn target(&self) -> u64 {
        self.to
    }

    /// Whether the difference is too small to animate, in which case the animation consists of
    /// a single frame with the target value.
    pub const fn is_snap(&self) -> bool {
        self.from.abs_diff(self.to) < SNAP_THRESHOLD
    }

    /// The value displayed `elapsed` after the animation started.
    pub fn value_at(&self, elapsed: Duration) -> u64 {
        if self.is_snap() || elapsed >= self.duration {
            return self.to;
        }

        self.value_at_progress(elapsed.as_secs_f64() / self.duration.as_secs_f64())
    }

    fn value_at_progress(&self, progress: f64) -> u64 {
        if progress >= 1.0 {
            return self.to;
        }

        let eased = self.easing.apply(progress);
        let delta = self.to.as_f64() - self.from.as_f64();

        num::floor_u64(self.from.as_f64() + delta * eased)
    }

    fn frame_count(&self) -> u32 {
        if self.is_snap() || self.frame_interval.is_zero() {
            return 1;
        }

        let frames = self.duration.as_nanos().div_ceil(self.frame_interval.as_nanos());

        u32::try_from(frames).unwrap_or(u32::MAX).max(1)
    }
}

impl Iterator for Animation {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.frame > self.frames {
            return None;
        }

        let progress = f64::from(self.frame) / f64::from(self.frames);
        self.frame += 1;

        Some(self.value_at_progress(progress))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.frames.saturating_sub(self.frame - 1)).unwrap_or(0);

        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Animation {}
impl FusedIterator for Animation {}
