#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal driver for the traffic map.
//!
//! `encode` prints one hour's encodings as JSON lines, `compare` prints
//! the neighborhood table behind the dashboard chart, and `replay` runs a
//! full session with log renderers so playback can be watched in the
//! terminal.
//!
//! Logging goes through [`traffic_map_cli_utils::init_logger`]; set
//! `RUST_LOG=info` to see the session's paints.

mod renderer;
mod table;

use std::io::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use traffic_map_feature::load_collection;
use traffic_map_feature_models::DatasetKind;
use traffic_map_time_models::{Hour, TimeBucket, TimeOfDay};
use traffic_map_view::{RenderPass, ViewConfig, ViewController, spawn_loaders, spawn_session};

use crate::renderer::{LogChart, LogRenderer, PaintSummary};

#[derive(Parser)]
#[command(name = "traffic_map", about = "Hourly traffic and transit map, headless")]
struct Cli {
    /// Session config TOML. Falls back to `TRAFFIC_MAP_CONFIG`, then
    /// built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prints every feature's encoding for one hour as JSON lines
    Encode {
        /// Dataset to encode
        #[arg(long, value_parser = parse_kind, default_value = "traffic")]
        mode: DatasetKind,
        /// Hour of day, 0-23
        #[arg(long, value_parser = parse_hour, default_value = "8")]
        hour: Hour,
    },
    /// Prints traffic and transit totals per neighborhood and period
    Compare {
        /// Only this neighborhood
        #[arg(long)]
        neighborhood: Option<String>,
        /// Only this period (morning, midday, evening)
        #[arg(long, value_parser = parse_period)]
        bucket: Option<TimeOfDay>,
    },
    /// Runs a playback session and logs what the map would show
    Replay {
        /// Number of playback ticks to run
        #[arg(long, default_value_t = 24)]
        ticks: u32,
        /// Layer to show, overriding the config
        #[arg(long, value_parser = parse_kind)]
        mode: Option<DatasetKind>,
        /// Neighborhood to chart, overriding the first in the set
        #[arg(long)]
        neighborhood: Option<String>,
    },
}

fn parse_hour(value: &str) -> Result<Hour, String> {
    let value: u8 = value.parse().map_err(|e: std::num::ParseIntError| e.to_string())?;
    Hour::new(value).map_err(|e| e.to_string())
}

fn parse_kind(value: &str) -> Result<DatasetKind, String> {
    value
        .parse()
        .map_err(|_| format!("unknown dataset '{value}': expected traffic or transit"))
}

fn parse_period(value: &str) -> Result<TimeOfDay, String> {
    value
        .parse()
        .map_err(|_| format!("unknown period '{value}': expected morning, midday or evening"))
}

/// Time to let `ticks` playback ticks fire, plus half an interval of
/// slack. `None` when it does not fit in a [`Duration`].
fn replay_duration(interval: Duration, ticks: u32) -> Option<Duration> {
    interval.checked_mul(ticks)?.checked_add(interval / 2)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _multi = traffic_map_cli_utils::init_logger();
    let cli = Cli::parse();
    let config = ViewConfig::resolve(cli.config.as_deref())?;
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Encode { mode, hour } => {
            let collection = load_collection(&client, config.data.source(mode), mode).await?;
            let pass = RenderPass::build(&collection, hour, true);
            log::info!("{}", PaintSummary::of(&pass));

            let mut out = std::io::stdout().lock();
            for feature in &pass.features {
                serde_json::to_writer(&mut out, feature)?;
                writeln!(out)?;
            }
        }
        Commands::Compare {
            neighborhood,
            bucket,
        } => {
            let set = config.neighborhood_set()?;
            let buckets = bucket.map_or_else(TimeBucket::defaults, |period| {
                vec![TimeBucket::from(period)]
            });
            let names: Vec<&str> = match &neighborhood {
                Some(name) => {
                    if set.get(name).is_none() {
                        log::warn!("'{name}' is not in set '{}', its totals are zero", set.id());
                    }
                    vec![name.as_str()]
                }
                None => set.neighborhoods().iter().map(|nb| nb.name()).collect(),
            };

            let (traffic, transit) = tokio::try_join!(
                load_collection(&client, &config.data.traffic, DatasetKind::Traffic),
                load_collection(&client, &config.data.transit, DatasetKind::Transit),
            )?;
            let traffic = traffic_map_neighborhood::aggregate(&traffic, set.neighborhoods(), &buckets);
            let transit = traffic_map_neighborhood::aggregate(&transit, set.neighborhoods(), &buckets);

            print!("{}", table::comparison_table(&names, &traffic, &transit));
        }
        Commands::Replay {
            ticks,
            mode,
            neighborhood,
        } => {
            let mut controller = ViewController::from_config(&config)?;
            controller.add_renderer(Box::new(LogRenderer));
            controller.add_chart(Box::new(LogChart));

            let interval = config.tick_interval().max(Duration::from_millis(1));
            let run_for = replay_duration(interval, ticks)
                .ok_or_else(|| format!("--ticks {ticks} at {interval:?} per tick is too long"))?;
            let (handle, session) = spawn_session(controller, interval);
            for loader in spawn_loaders(&client, &config, &handle) {
                loader.await?;
            }

            if let Some(mode) = mode {
                handle.switch_mode(mode).await?;
            }
            if let Some(name) = neighborhood {
                handle.select_neighborhood(name).await?;
            }

            handle.play().await?;
            tokio::time::sleep(run_for).await;
            handle.pause().await?;

            let state = handle.state().await?;
            println!(
                "stopped at {} showing {} after {ticks} ticks",
                state.current_hour, state.mode
            );

            handle.shutdown().await?;
            session.await?;
        }
    }

    Ok(())
}
