//! Grind sessions.
//!
//! Grinding is tracked separately from regular practice: every session ("slash") adds its
//! [session TGI](crate::tgi::for_session) to a running total, and the rank is derived from that
//! total with [`rank::from_total_tgi()`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Timestamp;
use crate::decay;
use crate::population::{Milestone, Milestones};
use crate::rank::{self, Target};
use crate::tgi;

/// Everything remembered about a user's grind sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct GrindingStats {
    /// Sum of the TGI earned in every session.
    pub total_tgi: f64,
    /// Rank derived from [`total_tgi`](Self::total_tgi).
    pub current_rank: u64,

    /// When the last session ended; [`None`] if there never was one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_slashed_at: Option<Timestamp>,

    /// The best (lowest) rank ever reached.
    pub best_rank: u64,
}

/// The outcome of a single grind session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SlashLog {
    /// How long the session lasted, in seconds.
    pub duration_secs: u64,
    /// TGI earned during the session.
    pub earned_tgi: f64,
    /// When the session ended.
    pub executed_at: Timestamp,
    /// Rank at the start of the session.
    pub rank_before: u64,
    /// Rank at the end of the session.
    pub rank_after: u64,
    /// Number of people overtaken during the session.
    pub overtaken: u64,

    /// Milestones passed during this session, largest first.
    pub crossed: Vec<Milestone>,

    /// The next milestone to pass from [`rank_after`](Self::rank_after).
    pub next_target: Option<Target>,
}

impl GrindingStats {
    /// Stats for someone who has never grinded, ranked last among `reference` people.
    pub const fn new(reference: u64) -> Self {
        Self { total_tgi: 0.0, current_rank: reference, last_slashed_at: None, best_rank: reference }
    }

    /// See [`decay::rust_level()`].
    pub fn rust_level(&self, now: Timestamp) -> f64 {
        decay::rust_level(self.last_slashed_at, now)
    }
}

/// Records a grind session lasting `elapsed` that ended at `now`.
///
/// Returns the updated stats and a log of the session; `stats` itself is left untouched.
pub fn commit(
    stats: &GrindingStats,
    elapsed: Duration,
    now: Timestamp,
    reference: u64,
    milestones: &Milestones,
) -> (GrindingStats, SlashLog) {
    let earned_tgi = tgi::for_session(elapsed);
    let total_tgi = stats.total_tgi.max(0.0) + earned_tgi;
    let rank_before = stats.current_rank;
    let rank_after = rank::from_total_tgi(total_tgi, reference);
    let overtaken = rank::overtaken(rank_before, rank_after);
    let crossed = rank::crossed_milestones(milestones, rank_before, rank_after)
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();

    debug!(earned_tgi, total_tgi, rank_before, rank_after, overtaken, "committed grind session");

    if let Some(milestone) = crossed.last() {
        info!(milestone = %milestone.name, crossed = crossed.len(), "passed milestone");
    }

    let updated = GrindingStats {
        total_tgi,
        current_rank: rank_after,
        last_slashed_at: Some(now),
        best_rank: stats.best_rank.min(rank_after),
    };

    let log = SlashLog {
        duration_secs: elapsed.as_secs(),
        earned_tgi,
        executed_at: now,
        rank_before,
        rank_after,
        overtaken,
        crossed,
        next_target: rank::next_target(milestones, rank_after),
    };

    (updated, log)
}
