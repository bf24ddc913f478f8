#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `GeoJSON` parsing and asynchronous loading of traffic and transit
//! datasets.
//!
//! Datasets are read once, either from a local file or an http(s) URL,
//! and converted into immutable [`FeatureCollection`]s. Irregular feature
//! data (missing counts, odd geometry types) is tolerated during parsing;
//! only failures to fetch or parse the document as a whole surface as
//! [`LoadError`].
//!
//! [`ProgressCallback`] lets long-running readers report progress without
//! depending on a terminal.

pub mod load;
pub mod parse;
pub mod progress;

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use load::{load_boundary, load_collection};
pub use parse::{parse_boundary, parse_collection};
pub use progress::{NullProgress, ProgressCallback};
pub use traffic_map_feature_models::{
    DatasetKind, Feature, FeatureCollection, FeatureProperties, Geometry,
};

/// Errors that can occur while loading a dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading a local file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The document is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but is not a `FeatureCollection`.
    #[error("Expected a FeatureCollection, found {found}")]
    NotAFeatureCollection {
        /// The top-level `GeoJSON` object type that was found.
        found: &'static str,
    },

    /// The boundary document contains no usable geometry.
    #[error("Boundary has no geometry with a bounding box")]
    EmptyBoundary,
}

/// Where a dataset is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum DataSource {
    /// A local file.
    Path(PathBuf),
    /// An http(s) URL.
    Url(String),
}

impl DataSource {
    /// Short description used in log messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Url(url) => url.clone(),
        }
    }
}

impl From<String> for DataSource {
    fn from(value: String) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Url(value)
        } else {
            Self::Path(PathBuf::from(value))
        }
    }
}

impl From<&str> for DataSource {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl FromStr for DataSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<DataSource> for String {
    fn from(source: DataSource) -> Self {
        match source {
            DataSource::Path(path) => path.display().to_string(),
            DataSource::Url(url) => url,
        }
    }
}
