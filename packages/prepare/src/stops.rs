//! Rail and bus stops from the ridership exports.
//!
//! Neither export carries coordinates, so every stop is dropped at a
//! random spot near the city center. The generator is seeded so the same
//! seed always produces the same map.

use std::io::Read;

use geo::Coord;
use geojson::{Feature, FeatureCollection, JsonObject};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use traffic_map_feature::ProgressCallback;

use crate::profile::{BUS_AMPLITUDE, RAIL_AMPLITUDE, hourly_profile};
use crate::{PrepareError, feature_collection};

/// Seed used when none is given.
pub const DEFAULT_SEED: u64 = 42;
/// Bus stops kept when no limit is given.
pub const DEFAULT_BUS_LIMIT: usize = 30;

const CENTER: Coord<f64> = Coord {
    x: -111.89,
    y: 40.76,
};
const LON_JITTER: f64 = 0.03;
const LAT_JITTER: f64 = 0.04;

const RAIL_DEFAULT_BOARDINGS: f64 = 25.0;
const BUS_DEFAULT_BOARDINGS: f64 = 10.0;

const COMMUTER_RAIL: &str = "Commuter Rail";
const LIGHT_RAIL: &str = "Light Rail";
const LIGHT_RAIL_DISPLAY: &str = "TRAX";

/// Scatters stops around the city center.
#[derive(Debug, Clone)]
pub struct StopPlacer {
    rng: ChaCha8Rng,
}

impl StopPlacer {
    /// A placer whose positions are fully determined by `seed`.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Next position, within ±0.03° longitude and ±0.04° latitude of the
    /// center.
    pub fn next_position(&mut self) -> Coord<f64> {
        let lat = CENTER.y + self.rng.gen_range(-LAT_JITTER..=LAT_JITTER);
        let lon = CENTER.x + self.rng.gen_range(-LON_JITTER..=LON_JITTER);
        Coord { x: lon, y: lat }
    }
}

impl Default for StopPlacer {
    fn default() -> Self {
        Self::from_seed(DEFAULT_SEED)
    }
}

/// How many stations of each rail mode to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RailLimits {
    /// `FrontRunner` stations.
    pub commuter_rail: usize,
    /// TRAX stations.
    pub light_rail: usize,
}

impl Default for RailLimits {
    fn default() -> Self {
        Self {
            commuter_rail: 20,
            light_rail: 30,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RailRecord {
    #[serde(default)]
    mode: String,
    #[serde(default)]
    stopname: String,
    #[serde(default)]
    route: String,
    #[serde(default)]
    avgboardings: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BusRecord {
    #[serde(default)]
    stopname: String,
    #[serde(default)]
    routes: String,
    #[serde(default)]
    avgboardings: Option<String>,
}

/// Reads rail stops, keeping the first stations of each mode up to
/// `limits`. Other modes are ignored and light rail is relabeled TRAX.
///
/// # Errors
///
/// Returns [`PrepareError::Csv`] if the CSV header cannot be read.
pub fn prepare_rail(
    reader: impl Read,
    placer: &mut StopPlacer,
    limits: RailLimits,
    progress: &dyn ProgressCallback,
) -> Result<FeatureCollection, PrepareError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    csv_reader.headers()?;

    let mut features = Vec::new();
    let (mut commuter, mut light) = (0, 0);

    for result in csv_reader.deserialize::<RailRecord>() {
        if commuter >= limits.commuter_rail && light >= limits.light_rail {
            break;
        }
        progress.inc(1);

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::trace!("  skipping malformed row: {e}");
                continue;
            }
        };

        let mode = match record.mode.as_str() {
            COMMUTER_RAIL if commuter < limits.commuter_rail => {
                commuter += 1;
                COMMUTER_RAIL
            }
            LIGHT_RAIL if light < limits.light_rail => {
                light += 1;
                LIGHT_RAIL_DISPLAY
            }
            _ => continue,
        };

        let daily = parse_boardings(record.avgboardings.as_deref(), RAIL_DEFAULT_BOARDINGS);
        features.push(stop_feature(
            placer.next_position(),
            record.stopname,
            mode,
            record.route,
            hourly_profile(daily, RAIL_AMPLITUDE),
        ));
    }

    log::info!("Kept {commuter} commuter rail and {light} light rail stations");
    progress.finish(format!("{} rail stations", features.len()));
    Ok(feature_collection(features))
}

/// Reads the first `limit` bus stops. Each is labeled with its first
/// listed route.
///
/// # Errors
///
/// Returns [`PrepareError::Csv`] if the CSV header cannot be read.
pub fn prepare_bus(
    reader: impl Read,
    placer: &mut StopPlacer,
    limit: usize,
    progress: &dyn ProgressCallback,
) -> Result<FeatureCollection, PrepareError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    csv_reader.headers()?;

    progress.set_total(limit as u64);

    let mut features = Vec::new();
    for result in csv_reader.deserialize::<BusRecord>().take(limit) {
        progress.inc(1);
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::trace!("  skipping malformed row: {e}");
                continue;
            }
        };

        let daily = parse_boardings(record.avgboardings.as_deref(), BUS_DEFAULT_BOARDINGS);
        features.push(stop_feature(
            placer.next_position(),
            record.stopname,
            "Bus",
            bus_line(&record.routes),
            hourly_profile(daily, BUS_AMPLITUDE),
        ));
    }

    log::info!("Kept {} bus stops", features.len());
    progress.finish(format!("{} bus stops", features.len()));
    Ok(feature_collection(features))
}

fn parse_boardings(value: Option<&str>, default: f64) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// `"39, 227"` → `"Bus 39"`.
fn bus_line(routes: &str) -> String {
    let first = routes.split(',').next().unwrap_or_default().trim();
    if first.is_empty() {
        "Bus".to_string()
    } else {
        format!("Bus {first}")
    }
}

fn stop_feature(
    position: Coord<f64>,
    name: String,
    mode: &str,
    line: String,
    hourly: Vec<u64>,
) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("NAME".to_string(), name.into());
    properties.insert("MODE".to_string(), mode.into());
    properties.insert("LINE".to_string(), line.into());
    properties.insert("hourly_counts".to_string(), hourly.into());

    Feature {
        geometry: Some(geojson::Geometry::new(geojson::Value::Point(vec![
            position.x, position.y,
        ]))),
        properties: Some(properties),
        ..Feature::default()
    }
}
