//! Deriving streaks and last activity from activity timestamps.

use std::collections::BTreeSet;

use time::{Date, OffsetDateTime, UtcOffset};

use crate::Timestamp;
use crate::time::OutOfRange;

/// Counts the consecutive calendar days with activity, ending today or yesterday.
///
/// Days are local to `offset`. If the most recent activity happened before yesterday, the
/// streak is broken and this returns 0.
pub fn streak_days(
    timestamps: impl IntoIterator<Item = Timestamp>,
    now: Timestamp,
    offset: UtcOffset,
) -> Result<u32, OutOfRange> {
    let dates = timestamps
        .into_iter()
        .map(|timestamp| local_date(timestamp, offset))
        .collect::<Result<BTreeSet<Date>, OutOfRange>>()?;

    let Some(&latest) = dates.last() else {
        return Ok(0);
    };

    let today = local_date(now, offset)?;

    if latest != today && Some(latest) != today.previous_day() {
        trace!(%latest, %today, "streak is broken");
        return Ok(0);
    }

    let mut streak = 0_u32;
    let mut expected = Some(latest);

    for &date in dates.iter().rev() {
        if Some(date) != expected {
            break;
        }

        streak += 1;
        expected = date.previous_day();
    }

    Ok(streak)
}

/// The most recent of `timestamps`.
pub fn last_activity(timestamps: impl IntoIterator<Item = Timestamp>) -> Option<Timestamp> {
    timestamps.into_iter().max()
}

fn local_date(timestamp: Timestamp, offset: UtcOffset) -> Result<Date, OutOfRange> {
    let unix_secs = i64::try_from(timestamp.to_unix_ms() / 1000).unwrap_or(i64::MAX);
    let local_secs = unix_secs.saturating_add(i64::from(offset.whole_seconds()));
    let datetime = OffsetDateTime::from_unix_timestamp(local_secs)?;

    Ok(datetime.date())
}
