//! Numeric conversions shared by the rank models.
//!
//! Population sizes stay far below 2^53, so the integer <-> float round trips in here are
//! exact for every value the engine produces.

#![allow(clippy::as_conversions, clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

pub(crate) trait AsF64 {
    fn as_f64(&self) -> f64;
}

impl<T: AsF64> AsF64 for &T {
    fn as_f64(&self) -> f64 {
        T::as_f64(*self)
    }
}

impl AsF64 for f64 {
    fn as_f64(&self) -> f64 {
        *self
    }
}

impl AsF64 for u64 {
    fn as_f64(&self) -> f64 {
        *self as f64
    }
}

impl AsF64 for u32 {
    fn as_f64(&self) -> f64 {
        f64::from(*self)
    }
}

/// Floors `value` into an integer, saturating at the bounds of `u64`.
///
/// `NaN` and negative values become `0`.
pub(crate) fn floor_u64(value: f64) -> u64 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }

    // float -> int `as` casts saturate
    value.floor() as u64
}

/// Floors `value` into a rank, which is never smaller than 1.
pub(crate) fn floor_rank(value: f64) -> u64 {
    floor_u64(value).max(1)
}

/// Rounds `value` up into a `u32`, saturating at the bounds of `u32`.
pub(crate) fn ceil_u32(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }

    value.ceil() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floors_towards_zero() {
        assert_eq!(floor_u64(41.999), 41);
        assert_eq!(floor_u64(-3.0), 0);
        assert_eq!(floor_u64(f64::NAN), 0);
        assert_eq!(floor_u64(f64::INFINITY), u64::MAX);
    }

    #[test]
    fn ranks_are_at_least_one() {
        assert_eq!(floor_rank(0.25), 1);
        assert_eq!(floor_rank(-100.0), 1);
        assert_eq!(floor_rank(8_232_000_000.0), 8_232_000_000);
    }

    #[test]
    fn ceils_into_u32() {
        assert_eq!(ceil_u32(93.75), 94);
        assert_eq!(ceil_u32(94.0), 94);
        assert_eq!(ceil_u32(-1.0), 0);
    }
}
