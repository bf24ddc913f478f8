//! Road segments from the statewide AADT export.

use std::io::Read;

use geo::{Centroid, Contains, Coord, LineString, MultiPolygon};
use geojson::{Feature, FeatureCollection, JsonObject};
use serde::Deserialize;
use traffic_map_feature::ProgressCallback;

use crate::profile::{TRAFFIC_AMPLITUDE, hourly_profile};
use crate::{PrepareError, feature_collection};

/// Segments kept when no limit is given.
pub const DEFAULT_TRAFFIC_LIMIT: usize = 300;

/// One row of the AADT export.
#[derive(Debug, Deserialize)]
struct AadtRecord {
    /// Annual average daily traffic, with thousands separators.
    #[serde(rename = "AADT2013")]
    aadt: String,
    /// `MULTILINESTRING ((lon lat, ...))`.
    #[serde(rename = "the_geom", default)]
    geometry: String,
    #[serde(rename = "ROUTE_NAME", default)]
    route_name: String,
    #[serde(rename = "LOCATION", default)]
    location: String,
}

/// Reads AADT rows and keeps up to `limit` segments whose centroid lies
/// inside `boundary`.
///
/// Rows with an unreadable AADT figure or no coordinates are skipped.
///
/// # Errors
///
/// Returns [`PrepareError::Csv`] if the CSV header cannot be read.
pub fn prepare_traffic(
    reader: impl Read,
    boundary: &MultiPolygon<f64>,
    limit: usize,
    progress: &dyn ProgressCallback,
) -> Result<FeatureCollection, PrepareError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    csv_reader.headers()?;

    let mut features = Vec::new();
    let mut skipped = 0u64;
    let mut outside = 0u64;

    for result in csv_reader.deserialize::<AadtRecord>() {
        if features.len() >= limit {
            break;
        }
        progress.inc(1);

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::trace!("  skipping malformed row: {e}");
                skipped += 1;
                continue;
            }
        };

        let Some(daily) = parse_aadt(&record.aadt) else {
            skipped += 1;
            continue;
        };
        let coords = parse_multilinestring(&record.geometry);
        if coords.is_empty() {
            skipped += 1;
            continue;
        }

        let line = LineString::new(coords);
        if !line.centroid().is_some_and(|c| boundary.contains(&c)) {
            outside += 1;
            continue;
        }

        features.push(segment_feature(&line, record, daily));
        progress.set_message(format!("{} segments inside boundary", features.len()));
    }

    log::info!(
        "Kept {} road segments ({outside} outside boundary, {skipped} unreadable)",
        features.len()
    );
    progress.finish(format!("{} road segments", features.len()));
    Ok(feature_collection(features))
}

#[allow(clippy::cast_precision_loss)]
fn parse_aadt(text: &str) -> Option<f64> {
    text.trim().replace(',', "").parse::<i64>().ok().map(|v| v as f64)
}

/// Reads every `lon lat` pair of a WKT multilinestring into one vertex
/// list. Parts are joined end to end; pairs that do not parse are
/// dropped.
fn parse_multilinestring(wkt: &str) -> Vec<Coord<f64>> {
    let body = wkt.replace("MULTILINESTRING ((", "").replace("))", "");
    body.split(',')
        .filter_map(|pair| {
            let pair = pair.trim_matches(|c| c == ' ' || c == '(' || c == ')');
            let mut parts = pair.split_whitespace();
            let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
                return None;
            };
            Some(Coord {
                x: x.parse().ok()?,
                y: y.parse().ok()?,
            })
        })
        .collect()
}

fn segment_feature(line: &LineString<f64>, record: AadtRecord, daily: f64) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("ROUTE_NAME".to_string(), record.route_name.into());
    properties.insert("LOCATION".to_string(), record.location.into());
    properties.insert(
        "hourly_counts".to_string(),
        hourly_profile(daily, TRAFFIC_AMPLITUDE).into(),
    );

    let positions = line.coords().map(|c| vec![c.x, c.y]).collect();
    Feature {
        geometry: Some(geojson::Geometry::new(geojson::Value::LineString(positions))),
        properties: Some(properties),
        ..Feature::default()
    }
}
