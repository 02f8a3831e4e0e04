//! The tier table maps TGI thresholds to reference ranks.

use serde::{Deserialize, Serialize};

use crate::population::WORLD_POPULATION;

/// A named TGI threshold and the rank someone at exactly that threshold would have.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Tier {
    /// Display name.
    pub name: String,
    /// The lowest TGI that belongs to this tier.
    pub min_tgi: f64,
    /// The rank at exactly [`min_tgi`](Self::min_tgi).
    pub rank: u64,
}

/// An ordered, non-empty list of tiers.
///
/// Thresholds are strictly increasing and ranks strictly decreasing, which means every bracket
/// between two neighboring tiers has a non-zero width.
#[derive(Debug, Clone, PartialEq)]
pub struct TierTable(Vec<Tier>);

/// Returned by [`TierTable::new()`] for malformed tables.
#[derive(Debug, Display, Error)]
pub enum InvalidTierTable {
    /// No tiers at all.
    #[display("tier table must contain at least one tier")]
    Empty,

    /// A threshold is negative or not finite.
    #[display("tier `{name}` has an invalid TGI threshold ({min_tgi})")]
    InvalidThreshold {
        /// The offending tier.
        name: String,

        /// Its threshold.
        min_tgi: f64,
    },

    /// A reference rank is 0.
    #[display("tier `{name}` must have a reference rank of at least 1")]
    ZeroRank {
        /// The offending tier.
        name: String,
    },

    /// A threshold is not greater than the one before it.
    #[display("tier `{name}` must have a higher TGI threshold than the tier before it")]
    ThresholdNotIncreasing {
        /// The offending tier.
        name: String,
    },

    /// A rank is not smaller than the one before it.
    #[display("tier `{name}` must have a better reference rank than the tier before it")]
    RankNotDecreasing {
        /// The offending tier.
        name: String,
    },
}

impl Tier {
    /// Creates a tier.
    pub fn new(name: impl Into<String>, min_tgi: f64, rank: u64) -> Self {
        Self { name: name.into(), min_tgi, rank }
    }
}

impl TierTable {
    /// Validates `tiers`, which must already be in ascending order.
    pub fn new(tiers: Vec<Tier>) -> Result<Self, InvalidTierTable> {
        if tiers.is_empty() {
            return Err(InvalidTierTable::Empty);
        }

        for tier in &tiers {
            if !tier.min_tgi.is_finite() || tier.min_tgi < 0.0 {
                return Err(InvalidTierTable::InvalidThreshold {
                    name: tier.name.clone(),
                    min_tgi: tier.min_tgi,
                });
            }

            if tier.rank == 0 {
                return Err(InvalidTierTable::ZeroRank { name: tier.name.clone() });
            }
        }

        for pair in tiers.windows(2) {
            let [lower, upper] = pair else {
                unreachable!("windows(2) always yields pairs");
            };

            if lower.min_tgi >= upper.min_tgi {
                return Err(InvalidTierTable::ThresholdNotIncreasing { name: upper.name.clone() });
            }

            if lower.rank <= upper.rank {
                return Err(InvalidTierTable::RankNotDecreasing { name: upper.name.clone() });
            }
        }

        Ok(Self(tiers))
    }

    /// The lowest tier (the full reference population).
    pub fn first(&self) -> &Tier {
        self.0.first().expect("tier tables are never empty")
    }

    /// The highest tier; ranks saturate here.
    pub fn last(&self) -> &Tier {
        self.0.last().expect("tier tables are never empty")
    }

    /// Iterates over the tiers from the lowest threshold to the highest.
    pub fn iter(&self) -> impl Iterator<Item = &Tier> {
        self.0.iter()
    }

    /// Neighboring pairs of tiers, from the lowest bracket to the highest.
    pub fn brackets(&self) -> impl Iterator<Item = (&Tier, &Tier)> {
        self.0.iter().zip(self.0.iter().skip(1))
    }

    /// The tier `tgi` has reached, i.e. the highest tier whose threshold is at most `tgi`.
    ///
    /// Values below the first threshold still belong to the first tier.
    pub fn current(&self, tgi: f64) -> &Tier {
        self.0
            .iter()
            .rev()
            .find(|tier| tgi >= tier.min_tgi)
            .unwrap_or_else(|| self.first())
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self::new(default_tiers()).expect("built-in tier table should be valid")
    }
}

/// The built-in tier table.
pub fn default_tiers() -> Vec<Tier> {
    vec![
        Tier::new("Blunt", 0.0, WORLD_POPULATION),
        Tier::new("Sharp", 100.0, 3_200_000_000),
        Tier::new("Master", 1_000.0, 820_000_000),
        Tier::new("Supreme", 3_000.0, 82_000_000),
        Tier::new("Divine", 10_000.0, 8_000),
    ]
}
