//! Command line interface for the whetstone rank engine.

#[allow(unused_imports)]
#[macro_use(trace, debug, info, warn)]
extern crate tracing;

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use serde::Serialize;
use serde::de::DeserializeOwned;
use time::UtcOffset;
use tokio::runtime;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::{Layer as _, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use whetstone::animation::Animation;
use whetstone::grinding::GrindingStats;
use whetstone::levels::{self, Level};
use whetstone::{ActivityState, Engine, Timestamp, streak};

use self::cli::{AnimateArgs, Command, LevelArgs, SlashArgs, SnapshotArgs};
use self::config::{Config, TracingConfig};

mod cli;
mod config;
mod watch;

fn main() -> anyhow::Result<()> {
    let cli_args = cli::args();
    let mut config = if let Some(config_path) = cli_args.config_path.as_deref() {
        read_and_parse_config_file(config_path)?
    } else if fs::exists("./whetstone.toml")? {
        read_and_parse_config_file(Path::new("./whetstone.toml"))?
    } else {
        Config::default()
    };

    cli_args.apply_to_config(&mut config);

    let _guard = if config.tracing.enable {
        init_tracing(&config.tracing).context("failed to initialize tracing")?
    } else {
        None
    };

    let engine = Engine::new(&config.ranking).context("invalid ranking configuration")?;

    match cli_args.command {
        Command::Snapshot(args) => snapshot(&engine, &args),
        Command::Slash(args) => slash(&engine, &args),
        Command::Level(args) => level(&args),
        Command::Animate(args) => animate(&args),
        Command::Watch(args) => runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to construct tokio runtime")?
            .block_on(watch::run(&engine, &args)),
    }
}

fn read_and_parse_config_file(path: &Path) -> anyhow::Result<Config> {
    fs::read_to_string(path)
        .context("failed to read configuration file")
        .and_then(|text| toml::from_str(&text).context("failed to parse configuration file"))
}

fn init_tracing(config: &TracingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    assert!(config.enable, "tracing should only be initialized if enabled");

    let env_filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("whetstone=info,warn"))
    };

    let stderr = config.stderr.enable.then(|| {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_ansi(config.stderr.ansi)
            .with_writer(io::stderr)
    });

    let (files, guard) = config
        .files
        .enable
        .then(|| {
            if !config.files.directory.exists() {
                fs::create_dir_all(&config.files.directory).context("create log dir")?;
            }

            let log_dir = config
                .files
                .directory
                .canonicalize()
                .context("canonicalize log dir path")?;

            let (writer, guard) = tracing_appender::rolling::Builder::new()
                .rotation(Rotation::DAILY)
                .filename_prefix("whetstone")
                .filename_suffix("log")
                .build(&log_dir)
                .map(tracing_appender::non_blocking)
                .context("failed to initialize logger")?;

            let layer = tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(false)
                .with_file(true)
                .with_level(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::CLOSE)
                .with_target(true)
                .with_writer(writer);

            anyhow::Ok((layer, guard))
        })
        .transpose()?
        .unzip();

    let layers = tracing_subscriber::Layer::and_then(stderr, files);

    tracing_subscriber::registry()
        .with(layers.with_filter(env_filter()))
        .init();

    Ok(guard)
}

fn snapshot(engine: &Engine, args: &SnapshotArgs) -> anyhow::Result<()> {
    let now = args.now();
    let mut state = match args.state {
        Some(ref path) => read_json::<ActivityState>(path).context("failed to load activity state")?,
        None => ActivityState {
            total_active_seconds: args.seconds,
            total_discrete_actions: args.actions,
            current_streak_days: args.streak,
            last_activity: args.last_activity_ms.and_then(Timestamp::from_unix_ms_nonzero),
        },
    };

    if !args.activity_ms.is_empty() {
        let offset = UtcOffset::from_hms(args.utc_offset, 0, 0).context("invalid UTC offset")?;
        let activity = args.activity_ms.iter().copied().map(Timestamp::from_unix_ms);

        state.current_streak_days = streak::streak_days(activity.clone(), now, offset)
            .context("activity timestamp out of range")?;
        state.last_activity = streak::last_activity(activity);

        debug!(streak = state.current_streak_days, "derived streak from activity");
    }

    print_json(&engine.snapshot(&state, args.bucket, now))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct SlashOutput {
    slash: whetstone::grinding::SlashLog,
    stats: GrindingStats,

    /// Rust on the blade before this session.
    rust_level: f64,
}

fn slash(engine: &Engine, args: &SlashArgs) -> anyhow::Result<()> {
    let now = args.now();
    let stats = match args.stats {
        Some(ref path) if fs::exists(path)? => {
            read_json::<GrindingStats>(path).context("failed to load grinding stats")?
        },
        Some(ref path) => {
            info!(path = %path.display(), "no grinding stats yet; starting fresh");
            engine.new_grinding_stats()
        },
        None => engine.new_grinding_stats(),
    };

    let rust_level = stats.rust_level(now);
    let (stats, slash) = engine.commit_grind(&stats, Duration::from_secs(args.elapsed_secs), now);

    for milestone in &slash.crossed {
        info!(name = %milestone.name, population = milestone.population, "overtook {}", milestone.glyph);
    }

    if args.write {
        let path = args.stats.as_deref().context("`--write` requires `--stats`")?;
        let json = serde_json::to_string_pretty(&stats).context("failed to serialize stats")?;

        fs::write(path, json).context("failed to write grinding stats")?;
        debug!(path = %path.display(), "saved grinding stats");
    }

    print_json(&SlashOutput { slash, stats, rust_level })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct LevelOutput {
    #[serde(flatten)]
    progress: levels::LevelProgress,

    #[serde(skip_serializing_if = "Option::is_none")]
    level_up: Option<Level>,
}

fn level(args: &LevelArgs) -> anyhow::Result<()> {
    let progress = Level::progress(args.seconds);
    let level_up = args
        .before
        .and_then(|before| levels::level_up(before, args.seconds));

    if let Some(level) = level_up {
        info!(%level, "level up");
    }

    print_json(&LevelOutput { progress, level_up })
}

fn animate(args: &AnimateArgs) -> anyhow::Result<()> {
    let mut animation = match args.duration_ms {
        None => Animation::new(args.from, args.to, args.easing),
        Some(ms) => {
            Animation::with_duration(args.from, args.to, args.easing, Duration::from_millis(ms))
        },
    };

    if let Some(ms) = args.frame_interval_ms {
        animation = animation.with_frame_interval(Duration::from_millis(ms));
    }

    debug!(frames = animation.len(), easing = %args.easing, "animating");

    let frame_interval = animation.frame_interval();
    let mut stdout = io::stdout().lock();

    for frame in animation {
        writeln!(stdout, "{frame}")?;

        if args.realtime {
            stdout.flush()?;
            thread::sleep(frame_interval);
        }
    }

    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    fs::read_to_string(path)
        .with_context(|| format!("failed to read `{}`", path.display()))
        .and_then(|text| serde_json::from_str(&text).context("failed to parse JSON"))
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;

    writeln!(io::stdout(), "{json}").context("failed to write output")
}
