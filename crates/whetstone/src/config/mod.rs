//! Configuration of the engine's static tables.
//!
//! Every field has a default, so an empty configuration yields the built-in tables.

use serde::Deserialize;

use crate::population::Milestone;
use crate::tiers::Tier;

mod population;
pub use population::{BucketSize, PopulationConfig};

/// The engine's configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Population sizes.
    pub population: PopulationConfig,

    /// Replaces the built-in tier table.
    pub tiers: Option<Vec<Tier>>,

    /// Replaces the built-in milestones.
    pub milestones: Option<Vec<Milestone>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::{PopulationBucket, Region, WORLD_POPULATION};

    #[test]
    fn empty_config_uses_defaults() {
        let config = toml::from_str::<Config>("").unwrap();

        assert_eq!(config.population.reference, WORLD_POPULATION);
        assert!(config.population.buckets.is_empty());
        assert!(config.tiers.is_none());
        assert!(config.milestones.is_none());
    }

    #[test]
    fn full_config() {
        let config = toml::from_str::<Config>(
            r#"
            [population]
            reference = 1000000
            buckets = [{ bucket = "region:japan", size = 5000 }]

            [[tiers]]
            name = "Rookie"
            min-tgi = 0.0
            rank = 1000000

            [[tiers]]
            name = "Pro"
            min-tgi = 500.0
            rank = 10

            [[milestones]]
            name = "Village"
            population = 300
            "#,
        )
        .unwrap();

        assert_eq!(config.population.reference, 1_000_000);
        assert_eq!(config.population.buckets, [BucketSize {
            bucket: PopulationBucket::Region(Region::Japan),
            size: 5_000,
        }]);

        let tiers = config.tiers.unwrap();
        assert_eq!(tiers.len(), 2);
        assert_eq!(tiers.get(1), Some(&Tier::new("Pro", 500.0, 10)));

        let milestones = config.milestones.unwrap();
        assert_eq!(milestones, [Milestone::new("Village", 300, "")]);
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(toml::from_str::<Config>("foo = 1").is_err());
        assert!(toml::from_str::<Config>("[population]\nworld = 1").is_err());
        assert!(toml::from_str::<Config>("[population]\nbuckets = [{ bucket = \"mars\", size = 1 }]").is_err());
    }
}
