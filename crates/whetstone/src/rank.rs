//! Turning scores into ranks.
//!
//! There are two models:
//!
//! - [`from_tgi()`] interpolates between the reference ranks of a [`TierTable`]
//! - [`from_total_tgi()`] decays the reference population exponentially with the total TGI
//!   earned from grind sessions
//!
//! Both produce a rank of at least 1, where 1 is the best possible rank.

use serde::Serialize;

use crate::num::{self, AsF64};
use crate::population::{Milestone, Milestones};
use crate::tiers::TierTable;

/// How quickly [`from_total_tgi()`] approaches rank 1.
pub const DECAY_CONSTANT: f64 = 0.00138;

/// The next milestone to pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Target {
    /// The milestone to pass.
    pub milestone: Milestone,

    /// How many more people have to be overtaken to pass the milestone.
    pub remaining: u64,
}

/// Calculates a rank by interpolating linearly between the tiers bracketing `tgi`.
///
/// Values at or above the last tier's threshold saturate at its rank, values below the first
/// tier's threshold get the first tier's rank.
pub fn from_tgi(tgi: f64, tiers: &TierTable) -> u64 {
    let last = tiers.last();

    if tgi >= last.min_tgi {
        return last.rank;
    }

    let Some((lower, upper)) = tiers.brackets().find(|(_, upper)| tgi < upper.min_tgi) else {
        // only reachable for NaN
        return tiers.first().rank;
    };

    let progress = ((tgi - lower.min_tgi) / (upper.min_tgi - lower.min_tgi)).clamp(0.0, 1.0);
    let span = lower.rank.as_f64() - upper.rank.as_f64();

    num::floor_rank(lower.rank.as_f64() - span * progress)
}

/// Calculates a rank within `reference` people from the total TGI earned by grinding.
///
/// `from_total_tgi(0.0, reference) == reference`; the rank strictly decreases from there until
/// it reaches 1.
pub fn from_total_tgi(total_tgi: f64, reference: u64) -> u64 {
    let total_tgi = total_tgi.max(0.0);

    num::floor_rank(reference.as_f64() * f64::exp(-DECAY_CONSTANT * total_tgi))
}

/// Calculates a rank from a percentile (`0..=100`) within `population` people.
pub fn from_percentile(percentile: f64, population: u64) -> u64 {
    num::floor_rank(population.as_f64() * percentile / 100.0)
}

/// How many people were overtaken when moving from `before` to `after`.
pub const fn overtaken(before: u64, after: u64) -> u64 {
    before.saturating_sub(after)
}

/// The milestones passed when moving from rank `before` to rank `after`, largest first.
///
/// A milestone counts as passed if its population is smaller than `before`, and not smaller
/// than `after`.
pub fn crossed_milestones(milestones: &Milestones, before: u64, after: u64) -> Vec<&Milestone> {
    milestones
        .iter()
        .filter(|milestone| milestone.population < before && milestone.population >= after)
        .collect()
}

/// The largest milestone that has not been passed yet at `rank`.
///
/// Once all of them have been passed, the smallest one stays the target with nobody
/// [remaining](Target::remaining). Returns [`None`] only if there are no milestones.
pub fn next_target(milestones: &Milestones, rank: u64) -> Option<Target> {
    milestones
        .iter()
        .find(|milestone| milestone.population < rank)
        .or_else(|| milestones.iter().last())
        .map(|milestone| Target {
            milestone: milestone.clone(),
            remaining: rank.saturating_sub(milestone.population),
        })
}

/// How rare `rank` is within `population` people ("1 in N").
pub fn one_in(population: u64, rank: u64) -> u64 {
    (population / rank.max(1)).max(1)
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;
    use crate::population::WORLD_POPULATION;

    #[test]
    fn last_tier_saturates() {
        let tiers = TierTable::default();

        assert_eq!(from_tgi(10_000.0, &tiers), 8_000);
        assert_eq!(from_tgi(1e12, &tiers), 8_000);
        assert_eq!(from_tgi(f64::INFINITY, &tiers), 8_000);
    }

    #[test]
    fn tier_thresholds_hit_their_ranks() {
        let tiers = TierTable::default();

        for tier in tiers.iter() {
            assert_eq!(from_tgi(tier.min_tgi, &tiers), tier.rank, "{}", tier.name);
        }
    }

    #[test]
    fn interpolates_within_brackets() {
        let tiers = TierTable::default();

        assert_eq!(from_tgi(50.0, &tiers), 5_716_000_000);
        assert_eq!(from_tgi(2_000.0, &tiers), 451_000_000);
    }

    #[test]
    fn below_first_threshold() {
        let tiers = TierTable::new(vec![
            crate::tiers::Tier::new("a", 10.0, 1_000),
            crate::tiers::Tier::new("b", 20.0, 10),
        ])
        .unwrap();

        assert_eq!(from_tgi(0.0, &tiers), 1_000);
        assert_eq!(from_tgi(-50.0, &tiers), 1_000);
        assert_eq!(from_tgi(f64::NAN, &tiers), 1_000);
    }

    #[test]
    fn tgi_rank_is_non_increasing() {
        let tiers = TierTable::default();
        let mut rng = rand::thread_rng();
        let mut values = (0..1_000)
            .map(|_| rng.gen_range(0.0..20_000.0))
            .collect::<Vec<f64>>();

        values.sort_by(f64::total_cmp);

        let mut previous = u64::MAX;

        for tgi in values {
            let rank = from_tgi(tgi, &tiers);

            assert!(rank >= 1, "rank must be positive");
            assert!(rank <= previous, "rank increased at {tgi}");

            previous = rank;
        }
    }

    #[test]
    fn no_grinding_means_reference_rank() {
        assert_eq!(from_total_tgi(0.0, WORLD_POPULATION), WORLD_POPULATION);
        assert_eq!(from_total_tgi(-10.0, WORLD_POPULATION), WORLD_POPULATION);
        assert_eq!(from_total_tgi(f64::NAN, WORLD_POPULATION), WORLD_POPULATION);
    }

    #[test]
    fn total_tgi_rank_strictly_decreases() {
        let mut previous = from_total_tgi(0.0, WORLD_POPULATION);

        for total in 1..=10_000_u32 {
            let rank = from_total_tgi(f64::from(total), WORLD_POPULATION);

            assert!(rank < previous, "rank did not decrease at {total}");

            previous = rank;
        }
    }

    #[test]
    fn total_tgi_rank_bottoms_out_at_one() {
        assert_eq!(from_total_tgi(1e9, WORLD_POPULATION), 1);
    }

    #[test]
    fn overtaken_never_underflows() {
        assert_eq!(overtaken(100, 40), 60);
        assert_eq!(overtaken(40, 100), 0);
    }

    #[test]
    fn crossing_milestones() {
        let milestones = Milestones::default();
        let crossed = crossed_milestones(&milestones, 10_000_000, 5_000_000)
            .into_iter()
            .map(|milestone| milestone.name.as_str())
            .collect::<Vec<_>>();

        assert_eq!(crossed, ["Singapore"]);
    }

    #[test]
    fn crossing_milestone_boundaries() {
        let milestones = Milestones::new(vec![
            Milestone::new("ten", 10_000_000, ""),
            Milestone::new("seven", 7_000_000, ""),
            Milestone::new("six", 6_000_000, ""),
            Milestone::new("five", 5_000_000, ""),
            Milestone::new("four", 4_999_999, ""),
        ])
        .unwrap();

        let crossed = crossed_milestones(&milestones, 10_000_000, 5_000_000)
            .into_iter()
            .map(|milestone| milestone.population)
            .collect::<Vec<_>>();

        assert_eq!(crossed, [7_000_000, 6_000_000, 5_000_000]);
        assert!(crossed_milestones(&milestones, 5_000_000, 5_000_000).is_empty());
    }

    #[test]
    fn next_milestone() {
        let milestones = Milestones::default();
        let target = next_target(&milestones, WORLD_POPULATION).unwrap();

        assert_eq!(target.milestone.name, "India");
        assert_eq!(target.remaining, WORLD_POPULATION - 1_420_000_000);

        let target = next_target(&milestones, 10_000_000).unwrap();

        assert_eq!(target.milestone.name, "Singapore");
        assert_eq!(target.remaining, 4_100_000);

        assert!(next_target(&Milestones::new(Vec::new()).unwrap(), 100).is_none());
    }

    #[test]
    fn smallest_milestone_stays_the_target() {
        let milestones = Milestones::default();

        for rank in [800, 1] {
            let target = next_target(&milestones, rank).unwrap();

            assert_eq!(target.milestone.name, "Vatican City");
            assert_eq!(target.remaining, 0);
        }
    }

    #[test]
    fn rarity() {
        assert_eq!(one_in(WORLD_POPULATION, WORLD_POPULATION), 1);
        assert_eq!(one_in(WORLD_POPULATION, 8_232), 1_000_000);
        assert_eq!(one_in(100, 0), 100);
    }
}
