//! CLI argument handling.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use whetstone::Timestamp;
use whetstone::animation::Easing;
use whetstone::population::PopulationBucket;

use crate::config::Config;

pub fn args() -> Args {
    Args::parse()
}

#[derive(Debug, Parser)]
#[command(version, about = "Estimates population ranks from practice time")]
pub struct Args {
    /// Path to the configuration file.
    ///
    /// Will default to `./whetstone.toml` if unspecified.
    /// If that file does not exist, default configuration values will be used.
    #[arg(short, long = "config", global = true)]
    pub config_path: Option<PathBuf>,

    /// The population global ranks are measured against.
    ///
    /// This takes precedence over the value in the configuration file.
    #[arg(long, global = true)]
    pub reference_population: Option<u64>,

    /// Write logs to daily rotating files in this directory.
    ///
    /// This takes precedence over the value in the configuration file.
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate every model for a single activity snapshot.
    Snapshot(SnapshotArgs),

    /// Commit a grind session.
    Slash(SlashArgs),

    /// Show level progress for some amount of practice time.
    Level(LevelArgs),

    /// Print the frames of a counting animation.
    Animate(AnimateArgs),

    /// Keep a realtime estimate ticking every second.
    Watch(WatchArgs),
}

#[derive(Debug, clap::Args)]
pub struct SnapshotArgs {
    /// JSON file containing the activity state.
    #[arg(long, conflicts_with_all = ["seconds", "actions", "streak", "last_activity_ms"])]
    pub state: Option<PathBuf>,

    /// Total practice time in seconds.
    #[arg(long, default_value_t = 0)]
    pub seconds: u64,

    /// Number of completed actions.
    #[arg(long, default_value_t = 0)]
    pub actions: u64,

    /// Length of the current streak in days.
    #[arg(long, default_value_t = 0)]
    pub streak: u32,

    /// Time of the last activity (Unix milliseconds; 0 means "never").
    #[arg(long = "last-activity-ms")]
    pub last_activity_ms: Option<u64>,

    /// Activity timestamps (Unix milliseconds) to derive the streak and last activity from.
    #[arg(long = "activity-ms", value_delimiter = ',')]
    pub activity_ms: Vec<u64>,

    /// UTC offset in hours used to determine calendar days for the streak.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub utc_offset: i8,

    /// The population to rank against, e.g. `global`, `age:20s` or `region:japan`.
    #[arg(long, default_value_t = PopulationBucket::Global)]
    pub bucket: PopulationBucket,

    /// Evaluate at this time (Unix milliseconds) instead of now.
    #[arg(long = "now-ms")]
    pub now_ms: Option<u64>,
}

#[derive(Debug, clap::Args)]
pub struct SlashArgs {
    /// JSON file containing the grinding stats; fresh stats are used if it does not exist.
    #[arg(long)]
    pub stats: Option<PathBuf>,

    /// How long the session lasted, in seconds.
    #[arg(long)]
    pub elapsed_secs: u64,

    /// Write the updated stats back to `--stats`.
    #[arg(long, requires = "stats")]
    pub write: bool,

    /// Commit the session at this time (Unix milliseconds) instead of now.
    #[arg(long = "now-ms")]
    pub now_ms: Option<u64>,
}

#[derive(Debug, clap::Args)]
pub struct LevelArgs {
    /// Total practice time in seconds.
    #[arg(long)]
    pub seconds: u64,

    /// Practice time before the latest session, to check for a level up.
    #[arg(long)]
    pub before: Option<u64>,
}

#[derive(Debug, clap::Args)]
pub struct AnimateArgs {
    #[arg(long)]
    pub from: u64,

    #[arg(long)]
    pub to: u64,

    #[arg(long, default_value_t = Easing::Linear)]
    pub easing: Easing,

    /// Overrides the easing's default duration.
    #[arg(long)]
    pub duration_ms: Option<u64>,

    /// Time between two frames.
    #[arg(long)]
    pub frame_interval_ms: Option<u64>,

    /// Wait between frames instead of printing them all at once.
    #[arg(long)]
    pub realtime: bool,
}

#[derive(Debug, clap::Args)]
pub struct WatchArgs {
    /// Total practice time in seconds when starting.
    #[arg(long, default_value_t = 0)]
    pub seconds: u64,

    /// The population to rank against.
    #[arg(long, default_value_t = PopulationBucket::Global)]
    pub bucket: PopulationBucket,

    /// Stop after this many ticks.
    #[arg(long)]
    pub ticks: Option<u64>,
}

impl Args {
    /// Applies any overrides specified as CLI flags to the given config.
    pub fn apply_to_config(&self, config: &mut Config) {
        if let Some(reference) = self.reference_population {
            config.ranking.population.reference = reference;
        }

        if let Some(ref directory) = self.log_dir {
            config.tracing.files.enable = true;
            config.tracing.files.directory = directory.clone();
        }
    }
}

impl SnapshotArgs {
    pub fn now(&self) -> Timestamp {
        self.now_ms.map_or_else(Timestamp::now, Timestamp::from_unix_ms)
    }
}

impl SlashArgs {
    pub fn now(&self) -> Timestamp {
        self.now_ms.map_or_else(Timestamp::now, Timestamp::from_unix_ms)
    }
}
