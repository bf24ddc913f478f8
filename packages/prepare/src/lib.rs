#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Turns raw CSV exports into the hourly `GeoJSON` datasets the map
//! reads.
//!
//! Source data only carries a daily figure (AADT for roads, average
//! boardings for stops). Each feature gets a synthetic 24-hour profile
//! from [`profile::hourly_profile`]. Stop exports carry no coordinates,
//! so stops are scattered around the city center by a seeded
//! [`stops::StopPlacer`].

pub mod profile;
pub mod stops;
pub mod traffic;

use std::io::BufWriter;
use std::path::Path;

use geo::MultiPolygon;
use geojson::{FeatureCollection, GeoJson};
use thiserror::Error;

pub use profile::{BUS_AMPLITUDE, RAIL_AMPLITUDE, TRAFFIC_AMPLITUDE, hourly_profile};
pub use stops::{RailLimits, StopPlacer, prepare_bus, prepare_rail};
pub use traffic::prepare_traffic;

/// Errors that can occur while preparing a dataset.
#[derive(Debug, Error)]
pub enum PrepareError {
    /// File IO failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV header could not be read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An input is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The boundary document has no polygon to test against.
    #[error("Boundary error: {0}")]
    Boundary(String),
}

/// Reads the city boundary polygon from a `GeoJSON` document.
///
/// The first feature's geometry is used and must be a polygon or
/// multipolygon.
///
/// # Errors
///
/// Returns [`PrepareError`] if the document does not parse or holds no
/// polygon.
pub fn read_boundary(text: &str) -> Result<MultiPolygon<f64>, PrepareError> {
    let geometry = match text.parse::<GeoJson>()? {
        GeoJson::Geometry(geometry) => Some(geometry),
        GeoJson::Feature(feature) => feature.geometry,
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .next()
            .and_then(|f| f.geometry),
    }
    .ok_or_else(|| PrepareError::Boundary("no geometry".to_string()))?;

    match geo::Geometry::<f64>::try_from(geometry)? {
        geo::Geometry::Polygon(polygon) => Ok(MultiPolygon::new(vec![polygon])),
        geo::Geometry::MultiPolygon(polygons) => Ok(polygons),
        _ => Err(PrepareError::Boundary(
            "expected a polygon or multipolygon".to_string(),
        )),
    }
}

/// Reads a `GeoJSON` feature collection from disk.
///
/// # Errors
///
/// Returns [`PrepareError`] if the file cannot be read or is not a
/// feature collection.
pub fn read_collection(path: &Path) -> Result<FeatureCollection, PrepareError> {
    let text = std::fs::read_to_string(path)?;
    Ok(FeatureCollection::try_from(text.parse::<GeoJson>()?)?)
}

/// Writes a feature collection as indented `GeoJSON`.
///
/// # Errors
///
/// Returns [`PrepareError`] if the file cannot be created or written.
pub fn write_collection(path: &Path, collection: &FeatureCollection) -> Result<(), PrepareError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), collection)?;
    log::info!(
        "Saved {} features to {}",
        collection.features.len(),
        path.display()
    );
    Ok(())
}

/// Concatenates collections in order (rail first, then bus).
#[must_use]
pub fn combine(collections: impl IntoIterator<Item = FeatureCollection>) -> FeatureCollection {
    let features = collections
        .into_iter()
        .flat_map(|c| c.features)
        .collect();
    feature_collection(features)
}

pub(crate) const fn feature_collection(features: Vec<geojson::Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
