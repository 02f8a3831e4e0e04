//! Millisecond timestamps.

use std::time::Duration;
use std::{fmt, ops};

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::num::AsF64;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// A point in time, stored as milliseconds since the Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

/// Returned when a timestamp cannot be represented as a date.
#[derive(Debug, Display, Error, From)]
#[display("{_0}")]
pub struct OutOfRange(time::error::ComponentRange);

impl Timestamp {
    /// January 1st, 1970.
    pub const UNIX_EPOCH: Self = Self(0);

    /// The current time.
    pub fn now() -> Self {
        Self::from_datetime(OffsetDateTime::now_utc())
    }

    /// Creates a timestamp from milliseconds since the Unix epoch.
    pub const fn from_unix_ms(unix_ms: u64) -> Self {
        Self(unix_ms)
    }

    /// Like [`Timestamp::from_unix_ms()`], but treats `0` as "never".
    pub const fn from_unix_ms_nonzero(unix_ms: u64) -> Option<Self> {
        match unix_ms {
            0 => None,
            ms => Some(Self(ms)),
        }
    }

    /// Milliseconds since the Unix epoch.
    pub const fn to_unix_ms(self) -> u64 {
        self.0
    }

    /// Converts a date-time into a timestamp; anything before the epoch clamps to it.
    pub fn from_datetime(datetime: OffsetDateTime) -> Self {
        let unix_ms = datetime.unix_timestamp_nanos() / 1_000_000;

        Self(u64::try_from(unix_ms).unwrap_or(0))
    }

    /// Converts the timestamp into a UTC date-time.
    pub fn to_datetime(self) -> Result<OffsetDateTime, OutOfRange> {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(self.0) * 1_000_000)
            .map_err(OutOfRange)
    }

    /// Hours elapsed between `earlier` and `self`.
    ///
    /// A negative interval (`earlier` lies after `self`) counts as zero hours.
    pub fn hours_since(self, earlier: Self) -> f64 {
        self.0.saturating_sub(earlier.0).as_f64() / MILLIS_PER_HOUR
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, fmt)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime().map(|datetime| datetime.format(&Rfc3339)) {
            Ok(Ok(formatted)) => fmt.write_str(&formatted),
            Ok(Err(_)) | Err(_) => write!(fmt, "{}ms", self.0),
        }
    }
}

impl ops::Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, duration: Duration) -> Self::Output {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);

        Timestamp(self.0.saturating_add(millis))
    }
}
