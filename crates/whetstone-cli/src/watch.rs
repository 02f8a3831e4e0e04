//! The realtime ticker.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Context;
use tokio::time::{MissedTickBehavior, interval};
use tokio::{select, signal};
use whetstone::Engine;
use whetstone::percentile::Estimate;

use crate::cli::WatchArgs;

const TICK: Duration = Duration::from_secs(1);

/// Recomputes the estimate once per second of practice until cancelled.
pub async fn run(engine: &Engine, args: &WatchArgs) -> anyhow::Result<()> {
    let mut ticker = interval(TICK);
    let mut seconds = args.seconds;
    let mut ticks = 0_u64;
    let mut previous = None::<Estimate>;

    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(bucket = %args.bucket, seconds, "starting ticker");

    loop {
        select! {
            result = signal::ctrl_c() => {
                result.context("failed to listen for ctrl-c")?;
                info!(seconds, "stopping ticker");
                break Ok(());
            },

            _ = ticker.tick() => {
                let estimate = engine.realtime(seconds, args.bucket);

                if previous.is_some_and(|previous| previous.phase != estimate.phase) {
                    info!(phase = estimate.phase.title(), "entered new phase");
                }

                trace!(seconds, rank = estimate.rank, "tick");
                writeln!(io::stdout(), "{}", format_tick(&estimate))?;

                previous = Some(estimate);
                seconds = seconds.saturating_add(1);
                ticks += 1;

                if args.ticks.is_some_and(|limit| ticks >= limit) {
                    break Ok(());
                }
            },
        }
    }
}

fn format_tick(estimate: &Estimate) -> String {
    format!(
        "#{rank} | top {percentile:.5}% | {code} {title} | +{speed}/s",
        rank = estimate.rank,
        percentile = estimate.percentile,
        code = estimate.phase.code(),
        title = estimate.phase.title(),
        speed = estimate.overtaking_per_second(),
    )
}
