//! Reference populations.
//!
//! Ranks are always expressed relative to some population: the whole world, or one of the
//! demographic buckets a user may filter by. Milestones are named population sizes (countries)
//! used to put a rank into perspective ("you just overtook Iceland").

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The reference population every global rank is measured against.
pub const WORLD_POPULATION: u64 = 8_232_000_000;

/// Age groups, by decade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AgeGroup {
    /// Younger than 20.
    Teens,
    /// 20 to 29.
    Twenties,
    /// 30 to 39.
    Thirties,
    /// 40 to 49.
    Forties,
    /// 50 to 59.
    Fifties,
    /// 60 and older.
    SixtiesPlus,
}

/// Gender, as reported by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Gender {
    /// Men.
    Male,
    /// Women.
    Female,
    /// Anyone else.
    Other,
}

/// Geographic regions with their own population sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    /// Japan only.
    Japan,
    /// Asia, excluding Japan.
    Asia,
    /// North and Central America.
    NorthAmerica,
    /// Europe.
    Europe,
    /// Everywhere else.
    Other,
}

/// A population a rank can be computed against.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PopulationBucket {
    /// Everyone; the reference population.
    #[default]
    Global,
    /// Everyone in an age group.
    Age(AgeGroup),
    /// Everyone of a gender.
    Gender(Gender),
    /// Everyone in a region.
    Region(Region),
}

/// Which demographic attribute of a user to filter the population by.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PopulationFilter {
    /// No filter.
    #[default]
    Global,
    /// Filter by [`Demographics::age`].
    Age,
    /// Filter by [`Demographics::gender`].
    Gender,
    /// Filter by [`Demographics::region`].
    Region,
}

/// The (optional) demographic attributes of a user.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Demographics {
    /// Used by [`PopulationFilter::Age`].
    pub age: Option<AgeGroup>,

    /// Used by [`PopulationFilter::Gender`].
    pub gender: Option<Gender>,

    /// Used by [`PopulationFilter::Region`].
    pub region: Option<Region>,
}

/// Returned when parsing an unknown bucket, filter, or demographic value.
#[derive(Debug, Display, Error)]
#[display("`{value}` is not a valid {kind}")]
pub struct ParseBucketError {
    kind: &'static str,
    value: String,
}

impl ParseBucketError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self { kind, value: value.to_owned() }
    }
}

macro_rules! api_names {
    ($ty:ident, $kind:literal { $($variant:ident => $name:literal $(| $alias:literal)*),* $(,)? }) => {
        impl $ty {
            /// Every value, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Formats the value in the same way it is parsed.
            pub const fn api(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name),*
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt.write_str(self.api())
            }
        }

        impl FromStr for $ty {
            type Err = ParseBucketError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                $(
                    if value.eq_ignore_ascii_case($name) $(|| value.eq_ignore_ascii_case($alias))* {
                        return Ok(Self::$variant);
                    }
                )*

                Err(ParseBucketError::new($kind, value))
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                self.api().serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                String::deserialize(deserializer)?
                    .parse()
                    .map_err(serde::de::Error::custom)
            }
        }
    };
}

api_names!(AgeGroup, "age group" {
    Teens => "10s",
    Twenties => "20s",
    Thirties => "30s",
    Forties => "40s",
    Fifties => "50s",
    SixtiesPlus => "60s+" | "60s",
});

api_names!(Gender, "gender" {
    Male => "male",
    Female => "female",
    Other => "other",
});

api_names!(Region, "region" {
    Japan => "japan",
    Asia => "asia",
    NorthAmerica => "north-america" | "northamerica",
    Europe => "europe",
    Other => "other",
});

api_names!(PopulationFilter, "population filter" {
    Global => "global",
    Age => "age",
    Gender => "gender",
    Region => "region",
});

impl PopulationBucket {
    /// The size of this bucket in the built-in population table.
    pub const fn default_size(&self) -> u64 {
        match self {
            Self::Global => WORLD_POPULATION,
            Self::Age(AgeGroup::Teens) => 1_300_000_000,
            Self::Age(AgeGroup::Twenties) => 1_200_000_000,
            Self::Age(AgeGroup::Thirties) => 1_150_000_000,
            Self::Age(AgeGroup::Forties) => 1_000_000_000,
            Self::Age(AgeGroup::Fifties) => 900_000_000,
            Self::Age(AgeGroup::SixtiesPlus) => 2_680_000_000,
            Self::Gender(Gender::Male) => 4_150_000_000,
            Self::Gender(Gender::Female) => 4_080_000_000,
            Self::Gender(Gender::Other) => 2_000_000,
            Self::Region(Region::Japan) => 124_000_000,
            Self::Region(Region::Asia) => 4_700_000_000,
            Self::Region(Region::NorthAmerica) => 600_000_000,
            Self::Region(Region::Europe) => 740_000_000,
            Self::Region(Region::Other) => 2_068_000_000,
        }
    }
}

impl fmt::Display for PopulationBucket {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => fmt.write_str("global"),
            Self::Age(age) => write!(fmt, "age:{age}"),
            Self::Gender(gender) => write!(fmt, "gender:{gender}"),
            Self::Region(region) => write!(fmt, "region:{region}"),
        }
    }
}

impl FromStr for PopulationBucket {
    type Err = ParseBucketError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("global") {
            return Ok(Self::Global);
        }

        let Some((kind, name)) = value.split_once(':') else {
            return Err(ParseBucketError::new("population bucket", value));
        };

        match kind.to_ascii_lowercase().as_str() {
            "age" => name.parse().map(Self::Age),
            "gender" => name.parse().map(Self::Gender),
            "region" => name.parse().map(Self::Region),
            _ => Err(ParseBucketError::new("population bucket", value)),
        }
    }
}

impl Serialize for PopulationBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PopulationBucket {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

impl Demographics {
    /// Resolves `filter` against these demographics.
    ///
    /// Attributes the user did not specify fall back to [`PopulationBucket::Global`].
    pub fn bucket(&self, filter: PopulationFilter) -> PopulationBucket {
        match filter {
            PopulationFilter::Global => None,
            PopulationFilter::Age => self.age.map(PopulationBucket::Age),
            PopulationFilter::Gender => self.gender.map(PopulationBucket::Gender),
            PopulationFilter::Region => self.region.map(PopulationBucket::Region),
        }
        .unwrap_or(PopulationBucket::Global)
    }
}

/// Sizes of every [`PopulationBucket`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationRegistry {
    reference: u64,
    overrides: BTreeMap<PopulationBucket, u64>,
}

/// Returned by [`PopulationRegistry::new()`] for empty populations.
#[derive(Debug, Display, Error)]
#[display("population `{bucket}` must not be empty")]
pub struct InvalidPopulation {
    bucket: PopulationBucket,
}

impl PopulationRegistry {
    /// Creates a registry with the given reference population, overriding the sizes of some
    /// buckets.
    ///
    /// An override for [`PopulationBucket::Global`] replaces `reference`.
    pub fn new(
        reference: u64,
        overrides: impl IntoIterator<Item = (PopulationBucket, u64)>,
    ) -> Result<Self, InvalidPopulation> {
        let mut registry = Self { reference, overrides: BTreeMap::new() };

        for (bucket, size) in overrides {
            if size == 0 {
                return Err(InvalidPopulation { bucket });
            }

            if bucket == PopulationBucket::Global {
                warn!(size, "`global` bucket overrides the reference population");
                registry.reference = size;
            } else {
                registry.overrides.insert(bucket, size);
            }
        }

        if registry.reference == 0 {
            return Err(InvalidPopulation { bucket: PopulationBucket::Global });
        }

        Ok(registry)
    }

    /// The population global ranks are measured against.
    pub const fn reference(&self) -> u64 {
        self.reference
    }

    /// The number of people in `bucket`.
    pub fn size(&self, bucket: PopulationBucket) -> u64 {
        match bucket {
            PopulationBucket::Global => self.reference,
            bucket => self
                .overrides
                .get(&bucket)
                .copied()
                .unwrap_or_else(|| bucket.default_size()),
        }
    }
}

impl Default for PopulationRegistry {
    fn default() -> Self {
        Self { reference: WORLD_POPULATION, overrides: BTreeMap::new() }
    }
}

/// A named population size used for comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Milestone {
    /// Display name, e.g. a country.
    pub name: String,
    /// Number of people; ranks at or below this count as having passed it.
    pub population: u64,
    /// An emoji shown next to the name.
    #[serde(default)]
    pub glyph: String,
}

impl Milestone {
    /// Creates a milestone.
    pub fn new(name: impl Into<String>, population: u64, glyph: impl Into<String>) -> Self {
        Self { name: name.into(), population, glyph: glyph.into() }
    }
}

/// An immutable set of milestones, ordered by population (largest first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Milestones(Vec<Milestone>);

/// Returned by [`Milestones::new()`] for milestones with no population.
#[derive(Debug, Display, Error)]
#[display("milestone `{name}` must have a non-zero population")]
pub struct InvalidMilestone {
    name: String,
}

impl Milestones {
    /// Validates and sorts `milestones`.
    pub fn new(mut milestones: Vec<Milestone>) -> Result<Self, InvalidMilestone> {
        if let Some(empty) = milestones.iter().find(|milestone| milestone.population == 0) {
            return Err(InvalidMilestone { name: empty.name.clone() });
        }

        milestones.sort_by(|a, b| b.population.cmp(&a.population));

        Ok(Self(milestones))
    }

    /// Iterates over the milestones from the largest population to the smallest.
    pub fn iter(&self) -> impl Iterator<Item = &Milestone> {
        self.0.iter()
    }

    /// The number of milestones.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no milestones at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Milestones {
    fn default() -> Self {
        Self::new(default_milestones()).expect("built-in milestones should be valid")
    }
}

impl<'a> IntoIterator for &'a Milestones {
    type Item = &'a Milestone;
    type IntoIter = std::slice::Iter<'a, Milestone>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The built-in milestones: countries, from the smallest population to the largest.
pub fn default_milestones() -> Vec<Milestone> {
    [
        ("Vatican City", 800, "🇻🇦"),
        ("Tuvalu", 11_000, "🇹🇻"),
        ("Monaco", 39_000, "🇲🇨"),
        ("Iceland", 370_000, "🇮🇸"),
        ("Singapore", 5_900_000, "🇸🇬"),
        ("Greece", 10_000_000, "🇬🇷"),
        ("Australia", 26_000_000, "🇦🇺"),
        ("South Korea", 51_000_000, "🇰🇷"),
        ("United Kingdom", 67_000_000, "🇬🇧"),
        ("Germany", 84_000_000, "🇩🇪"),
        ("Japan", 124_000_000, "🇯🇵"),
        ("Russia", 144_000_000, "🇷🇺"),
        ("Brazil", 215_000_000, "🇧🇷"),
        ("Indonesia", 275_000_000, "🇮🇩"),
        ("United States", 333_000_000, "🇺🇸"),
        ("China", 1_400_000_000, "🇨🇳"),
        ("India", 1_420_000_000, "🇮🇳"),
    ]
    .into_iter()
    .map(|(name, population, glyph)| Milestone::new(name, population, glyph))
    .collect()
}
