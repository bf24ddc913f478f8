#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for building the map's `GeoJSON` datasets.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use traffic_map_cli_utils::IndicatifProgress;
use traffic_map_prepare::stops::{DEFAULT_BUS_LIMIT, DEFAULT_SEED};
use traffic_map_prepare::traffic::DEFAULT_TRAFFIC_LIMIT;
use traffic_map_prepare::{
    RailLimits, StopPlacer, combine, prepare_bus, prepare_rail, prepare_traffic, read_boundary,
    read_collection, write_collection,
};

#[derive(Parser)]
#[command(
    name = "traffic_map_prepare",
    about = "Builds hourly traffic and transit GeoJSON from raw CSV exports"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Road segments with hourly volumes from the AADT export
    Traffic {
        /// AADT CSV export
        input: PathBuf,
        /// City boundary `GeoJSON`; segments outside it are dropped
        #[arg(long)]
        boundary: PathBuf,
        /// Output `GeoJSON` path
        #[arg(long, short, default_value = "data/traffic_hourly_slc_sample.geojson")]
        output: PathBuf,
        /// Maximum number of segments to keep
        #[arg(long, default_value_t = DEFAULT_TRAFFIC_LIMIT)]
        limit: usize,
    },
    /// Rail stations with hourly ridership
    Rail {
        /// Rail stop ridership CSV
        input: PathBuf,
        /// Output `GeoJSON` path
        #[arg(long, short, default_value = "data/rail_ridership_hourly_sample.geojson")]
        output: PathBuf,
        /// Maximum commuter rail (`FrontRunner`) stations
        #[arg(long, default_value_t = RailLimits::default().commuter_rail)]
        commuter_rail: usize,
        /// Maximum light rail (TRAX) stations
        #[arg(long, default_value_t = RailLimits::default().light_rail)]
        light_rail: usize,
        /// Seed for stop placement
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
    /// Bus stops with hourly ridership
    Bus {
        /// Bus stop ridership CSV
        input: PathBuf,
        /// Output `GeoJSON` path
        #[arg(long, short, default_value = "data/bus_ridership_hourly_sample.geojson")]
        output: PathBuf,
        /// Maximum number of stops to keep
        #[arg(long, default_value_t = DEFAULT_BUS_LIMIT)]
        limit: usize,
        /// Seed for stop placement
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
    /// Concatenates stop collections (rail first, then bus) into one
    /// transit dataset
    Combine {
        /// Input `GeoJSON` collections, in output order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Output `GeoJSON` path
        #[arg(long, short, default_value = "data/transit_combined_hourly.geojson")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = traffic_map_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Traffic {
            input,
            boundary,
            output,
            limit,
        } => {
            let boundary = read_boundary(&std::fs::read_to_string(&boundary)?)?;
            let progress = IndicatifProgress::rows(&multi, "Reading road segments");
            let reader = BufReader::new(File::open(&input)?);
            let collection = prepare_traffic(reader, &boundary, limit, progress.as_ref())?;
            write_collection(&output, &collection)?;
        }
        Commands::Rail {
            input,
            output,
            commuter_rail,
            light_rail,
            seed,
        } => {
            let progress = IndicatifProgress::rows(&multi, "Reading rail stations");
            let limits = RailLimits {
                commuter_rail,
                light_rail,
            };
            let reader = BufReader::new(File::open(&input)?);
            let collection = prepare_rail(
                reader,
                &mut StopPlacer::from_seed(seed),
                limits,
                progress.as_ref(),
            )?;
            write_collection(&output, &collection)?;
        }
        Commands::Bus {
            input,
            output,
            limit,
            seed,
        } => {
            let progress = IndicatifProgress::rows(&multi, "Reading bus stops");
            let reader = BufReader::new(File::open(&input)?);
            let collection = prepare_bus(
                reader,
                &mut StopPlacer::from_seed(seed),
                limit,
                progress.as_ref(),
            )?;
            write_collection(&output, &collection)?;
        }
        Commands::Combine { inputs, output } => {
            let progress = IndicatifProgress::steps(&multi, "Combining", inputs.len() as u64);
            let mut collections = Vec::with_capacity(inputs.len());
            for path in &inputs {
                let collection = read_collection(path)?;
                log::info!(
                    "{}: {} features",
                    path.display(),
                    collection.features.len()
                );
                collections.push(collection);
                progress.inc(1);
            }
            let combined = combine(collections);
            progress.finish(format!("{} features", combined.features.len()));
            write_collection(&output, &combined)?;
        }
    }

    Ok(())
}
