use serde::Deserialize;

use crate::population::{PopulationBucket, WORLD_POPULATION};

/// The `[population]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PopulationConfig {
    /// The population global ranks are measured against.
    #[serde(default = "default_reference")]
    pub reference: u64,

    /// Overrides for the sizes of individual buckets.
    #[serde(default)]
    pub buckets: Vec<BucketSize>,
}

/// The size of a single population bucket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BucketSize {
    /// The bucket to resize.
    pub bucket: PopulationBucket,
    /// Number of people in [`bucket`](Self::bucket).
    pub size: u64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self { reference: default_reference(), buckets: Vec::new() }
    }
}

fn default_reference() -> u64 {
    WORLD_POPULATION
}
