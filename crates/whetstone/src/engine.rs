//! The entry point tying all the models together.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::{BucketSize, Config};
use crate::grinding::{self, GrindingStats, SlashLog};
use crate::percentile::{self, Estimate, Phase};
use crate::population::{
    InvalidMilestone,
    InvalidPopulation,
    Milestones,
    PopulationBucket,
    PopulationRegistry,
};
use crate::rank::{self, Target};
use crate::tiers::{InvalidTierTable, TierTable};
use crate::{Timestamp, decay, tgi};

/// A snapshot of everything the engine needs to know about a user.
///
/// The engine never keeps any of this around; callers pass a fresh snapshot on every call.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ActivityState {
    /// Total practice time, in seconds.
    pub total_active_seconds: u64,
    /// Number of discrete practice actions (e.g. completed sessions).
    pub total_discrete_actions: u64,
    /// Consecutive days with activity.
    pub current_streak_days: u32,

    /// `0` is treated as "never".
    #[serde(deserialize_with = "deserialize_last_activity")]
    pub last_activity: Option<Timestamp>,
}

/// The result of evaluating an [`ActivityState`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RankSnapshot {
    /// Rank within [`population`](Self::population), based on total practice time.
    pub rank: u64,
    /// The share of people still ahead, in `(0, 100]`.
    pub percentile: f64,
    /// The practice phase the user is in.
    pub phase: Phase,
    /// See [`decay::multiplier()`].
    pub decay_multiplier: f64,
    /// Whether any decay currently applies.
    pub rusting: bool,

    /// The bucket [`rank`](Self::rank) was computed against.
    pub bucket: PopulationBucket,
    /// The size of [`bucket`](Self::bucket).
    pub population: u64,

    /// "1 in N people".
    pub one_in: u64,
    /// How many people are overtaken per second of further practice.
    pub speed_per_second: f64,

    /// The decayed TGI.
    pub tgi: f64,

    /// Rank within the reference population, based on [`tgi`](Self::tgi).
    pub tgi_rank: u64,
    /// Name of the tier [`tgi`](Self::tgi) falls into.
    pub tier: String,

    /// The next milestone to pass, measured against [`tgi_rank`](Self::tgi_rank).
    pub next_milestone: Option<Target>,
}

/// The population rank engine.
///
/// Holds the static tables, which are validated once when the engine is created.
#[derive(Debug, Default, Clone)]
pub struct Engine {
    population: PopulationRegistry,
    tiers: TierTable,
    milestones: Milestones,
}

/// Returned by [`Engine::new()`] when one of the configured tables is invalid.
#[derive(Debug, Display, Error, From)]
pub enum InvalidConfig {
    /// A population bucket is empty.
    Population(InvalidPopulation),
    /// The tier table is malformed.
    Tiers(InvalidTierTable),
    /// A milestone has no population.
    Milestones(InvalidMilestone),
}

impl Engine {
    /// Builds an engine from `config`, validating every table.
    pub fn new(config: &Config) -> Result<Self, InvalidConfig> {
        let population = PopulationRegistry::new(
            config.population.reference,
            config
                .population
                .buckets
                .iter()
                .map(|&BucketSize { bucket, size }| (bucket, size)),
        )?;

        let tiers = match config.tiers {
            None => TierTable::default(),
            Some(ref tiers) => TierTable::new(tiers.clone())?,
        };

        let milestones = match config.milestones {
            None => Milestones::default(),
            Some(ref milestones) => Milestones::new(milestones.clone())?,
        };

        debug!(
            reference = population.reference(),
            tiers = tiers.iter().count(),
            milestones = milestones.len(),
            "loaded ranking tables",
        );

        Ok(Self { population, tiers, milestones })
    }

    /// The population sizes ranks are computed against.
    pub const fn population(&self) -> &PopulationRegistry {
        &self.population
    }

    /// The tier table used for TGI ranks.
    pub const fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    /// The milestones ranks are compared to.
    pub const fn milestones(&self) -> &Milestones {
        &self.milestones
    }

    /// Evaluates every model for `state` at `now`, ranking against `bucket`.
    #[tracing::instrument(level = "trace", skip(self), ret)]
    pub fn snapshot(
        &self,
        state: &ActivityState,
        bucket: PopulationBucket,
        now: Timestamp,
    ) -> RankSnapshot {
        let population = self.population.size(bucket);
        let estimate = self.realtime(state.total_active_seconds, bucket);

        let decay_multiplier = decay::multiplier(state.last_activity, now);
        let tgi = tgi::compute(
            state.total_discrete_actions,
            state.current_streak_days,
            Duration::from_secs(state.total_active_seconds).as_secs_f64() / 60.0,
            decay_multiplier,
        );

        trace!(tgi, decay_multiplier, phase = ?estimate.phase, "evaluated models");

        let tgi_rank = rank::from_tgi(tgi, &self.tiers);

        RankSnapshot {
            rank: estimate.rank,
            percentile: estimate.percentile,
            phase: estimate.phase,
            decay_multiplier,
            rusting: decay::is_rusting(decay_multiplier),
            bucket,
            population,
            one_in: rank::one_in(population, estimate.rank),
            speed_per_second: estimate.speed_per_second,
            tgi,
            tgi_rank,
            tier: self.tiers.current(tgi).name.clone(),
            next_milestone: rank::next_target(&self.milestones, tgi_rank),
        }
    }

    /// The hours-based estimate only; cheap enough to recompute on every tick.
    pub fn realtime(&self, total_active_seconds: u64, bucket: PopulationBucket) -> Estimate {
        percentile::from_seconds(total_active_seconds, self.population.size(bucket))
    }

    /// Stats for a user who has never grinded.
    pub const fn new_grinding_stats(&self) -> GrindingStats {
        GrindingStats::new(self.population.reference())
    }

    /// Records a grind session; see [`grinding::commit()`].
    #[tracing::instrument(level = "trace", skip(self), ret)]
    pub fn commit_grind(
        &self,
        stats: &GrindingStats,
        elapsed: Duration,
        now: Timestamp,
    ) -> (GrindingStats, SlashLog) {
        grinding::commit(stats, elapsed, now, self.population.reference(), &self.milestones)
    }
}

fn deserialize_last_activity<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<u64>::deserialize(deserializer)
        .map(|value| value.and_then(Timestamp::from_unix_ms_nonzero))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::{Region, WORLD_POPULATION};
    use crate::tiers::Tier;

    const NOW: Timestamp = Timestamp::from_unix_ms(1_700_000_000_000);
    const HOUR: u64 = 3600;

    fn hours_ago(hours: u64) -> Option<Timestamp> {
        Timestamp::from_unix_ms_nonzero(NOW.to_unix_ms() - hours * 3_600_000)
    }

    #[test]
    fn new_user() {
        let engine = Engine::default();
        let snapshot = engine.snapshot(&ActivityState::default(), PopulationBucket::Global, NOW);

        assert_eq!(snapshot.rank, WORLD_POPULATION);
        assert_eq!(snapshot.percentile, 100.0);
        assert_eq!(snapshot.phase, Phase::Onboarding);
        assert_eq!(snapshot.decay_multiplier, 1.0);
        assert!(!snapshot.rusting, "new users are not rusting");
        assert_eq!(snapshot.tgi, 0.0);
        assert_eq!(snapshot.tgi_rank, WORLD_POPULATION);
        assert_eq!(snapshot.tier, "Blunt");
        assert_eq!(snapshot.one_in, 1);
        assert_eq!(snapshot.next_milestone.unwrap().milestone.name, "India");
    }

    #[test]
    fn active_user() {
        let engine = Engine::default();
        let state = ActivityState {
            total_active_seconds: 120 * 60,
            total_discrete_actions: 10,
            current_streak_days: 5,
            last_activity: hours_ago(1),
        };

        let snapshot = engine.snapshot(&state, PopulationBucket::Global, NOW);

        assert!((snapshot.tgi - 79.0).abs() < 1e-9, "{}", snapshot.tgi);
        assert_eq!(snapshot.percentile, 98.0);
        assert_eq!(snapshot.tier, "Blunt");
    }

    #[test]
    fn inactive_user_rusts() {
        let engine = Engine::default();
        let state = ActivityState {
            total_active_seconds: 120 * 60,
            total_discrete_actions: 10,
            current_streak_days: 5,
            last_activity: hours_ago(100),
        };

        let snapshot = engine.snapshot(&state, PopulationBucket::Global, NOW);

        assert_eq!(snapshot.decay_multiplier, 0.8);
        assert!(snapshot.rusting, "100 hours of inactivity should rust");
        assert!((snapshot.tgi - 63.2).abs() < 1e-9, "{}", snapshot.tgi);

        // decay never touches the hours-based percentile
        assert_eq!(snapshot.percentile, 98.0);
    }

    #[test]
    fn buckets_scale_the_rank() {
        let engine = Engine::default();
        let state = ActivityState { total_active_seconds: 20 * HOUR, ..Default::default() };
        let japan = PopulationBucket::Region(Region::Japan);
        let snapshot = engine.snapshot(&state, japan, NOW);

        assert_eq!(snapshot.population, 124_000_000);
        assert_eq!(snapshot.rank, 99_200_000);
        assert_eq!(snapshot.bucket, japan);
    }

    #[test]
    fn next_milestone_ignores_the_bucket() {
        let engine = Engine::default();
        let japan = PopulationBucket::Region(Region::Japan);
        let snapshot = engine.snapshot(&ActivityState::default(), japan, NOW);

        assert_eq!(snapshot.rank, 124_000_000);
        assert_eq!(snapshot.tgi_rank, WORLD_POPULATION);

        let target = snapshot.next_milestone.unwrap();

        assert_eq!(target.milestone.name, "India");
        assert_eq!(target.remaining, WORLD_POPULATION - 1_420_000_000);
    }

    #[test]
    fn custom_tables() {
        let config = Config {
            population: crate::config::PopulationConfig {
                reference: 1_000,
                buckets: vec![BucketSize {
                    bucket: PopulationBucket::Region(Region::Japan),
                    size: 10,
                }],
            },
            tiers: Some(vec![Tier::new("low", 0.0, 1_000), Tier::new("high", 10.0, 1)]),
            milestones: Some(Vec::new()),
        };

        let engine = Engine::new(&config).unwrap();

        assert_eq!(engine.population().size(PopulationBucket::Region(Region::Japan)), 10);
        assert_eq!(engine.new_grinding_stats().current_rank, 1_000);

        let state = ActivityState { total_discrete_actions: 4, ..Default::default() };
        let snapshot = engine.snapshot(&state, PopulationBucket::Global, NOW);

        assert_eq!(snapshot.tgi_rank, 1);
        assert_eq!(snapshot.tier, "high");
        assert_eq!(snapshot.next_milestone, None);
    }

    #[test]
    fn invalid_tables_are_rejected() {
        let config = Config { tiers: Some(Vec::new()), ..Default::default() };
        assert!(matches!(Engine::new(&config), Err(InvalidConfig::Tiers(_))));

        let config = Config {
            milestones: Some(vec![crate::population::Milestone::new("nowhere", 0, "")]),
            ..Default::default()
        };
        assert!(matches!(Engine::new(&config), Err(InvalidConfig::Milestones(_))));

        let mut config = Config::default();
        config.population.reference = 0;
        assert!(matches!(Engine::new(&config), Err(InvalidConfig::Population(_))));
    }

    #[test]
    fn grind_sessions() {
        let engine = Engine::default();
        let stats = engine.new_grinding_stats();
        let (stats, first) = engine.commit_grind(&stats, Duration::from_secs(3600), NOW);
        let (stats, second) = engine.commit_grind(&stats, Duration::from_secs(3600), NOW);

        assert_eq!(stats.total_tgi, 120.0);
        assert_eq!(second.rank_before, first.rank_after);
        assert!(second.rank_after < second.rank_before, "grinding should improve the rank");
        assert_eq!(stats.best_rank, second.rank_after);
    }

    #[test]
    fn state_from_json() {
        let state = serde_json::from_str::<ActivityState>(
            r#"{ "total-active-seconds": 3600, "last-activity": 0 }"#,
        )
        .unwrap();

        assert_eq!(state.total_active_seconds, 3600);
        assert_eq!(state.last_activity, None);

        let state =
            serde_json::from_str::<ActivityState>(r#"{ "last-activity": 1700000000000 }"#).unwrap();

        assert_eq!(state.last_activity, Some(NOW));
    }

    #[test]
    fn pure() {
        let engine = Engine::default();
        let state = ActivityState {
            total_active_seconds: 555 * HOUR,
            total_discrete_actions: 321,
            current_streak_days: 12,
            last_activity: hours_ago(30),
        };

        assert_eq!(
            engine.snapshot(&state, PopulationBucket::Global, NOW),
            engine.snapshot(&state, PopulationBucket::Global, NOW),
        );
    }
}
