#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Traffic and transit feature types with hourly counts.
//!
//! A [`FeatureCollection`] is loaded once per dataset (traffic road
//! segments or transit stops) and never mutated afterwards. Each
//! [`Feature`] carries a geometry and a 24-slot `hourly_counts` series;
//! missing or malformed count slots read as zero.

use geo::Coord;
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use traffic_map_time_models::Hour;

/// Which dataset a collection (and a map layer) belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DatasetKind {
    /// Road segments with hourly vehicle volumes (line geometries).
    Traffic,
    /// Transit stops with hourly ridership (point geometries).
    Transit,
}

impl DatasetKind {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Traffic, Self::Transit]
    }
}

/// Geometry of a single feature.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// A single `(longitude, latitude)` coordinate.
    Point(Coord<f64>),
    /// An ordered sequence of coordinates.
    LineString(Vec<Coord<f64>>),
    /// Several line parts.
    MultiLineString(Vec<Vec<Coord<f64>>>),
    /// Any other geometry type, or a missing geometry. Kept so feature
    /// indices stay aligned with the source collection.
    Other,
}

impl Geometry {
    /// The single coordinate used to place this feature in a neighborhood.
    ///
    /// Lines use the vertex at index `len / 2` rather than a true
    /// centroid. Multi-lines are drawn but never placed, like empty or
    /// unsupported geometries, so they return `None`.
    #[must_use]
    pub fn representative_coordinate(&self) -> Option<Coord<f64>> {
        match self {
            Self::Point(coord) => Some(*coord),
            Self::LineString(coords) => middle_vertex(coords),
            Self::MultiLineString(_) | Self::Other => None,
        }
    }
}

fn middle_vertex(coords: &[Coord<f64>]) -> Option<Coord<f64>> {
    coords.get(coords.len() / 2).copied()
}

/// Feature properties consumed by the encoder and aggregator.
///
/// Field names match the upstream `GeoJSON` exports. All fields are
/// optional; malformed values are read leniently rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureProperties {
    /// One count per hour of the day.
    #[serde(default, deserialize_with = "lenient_counts")]
    pub hourly_counts: Vec<u64>,
    /// Road segment description (traffic).
    #[serde(
        rename = "LOCATION",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<String>,
    /// Route name (traffic).
    #[serde(
        rename = "ROUTE_NAME",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub route_name: Option<String>,
    /// Stop name (transit).
    #[serde(
        rename = "NAME",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    /// Transit mode, e.g. `"TRAX"` or `"Bus"`.
    #[serde(
        rename = "MODE",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub mode: Option<String>,
    /// Transit line, e.g. `"Red Line"` or `"Bus 72"`.
    #[serde(
        rename = "LINE",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub line: Option<String>,
}

impl FeatureProperties {
    /// The count recorded for `hour`, or 0 when the slot is missing.
    #[must_use]
    pub fn volume_at(&self, hour: Hour) -> u64 {
        self.hourly_counts.get(hour.index()).copied().unwrap_or(0)
    }

    /// Transit mode, or an empty string.
    #[must_use]
    pub fn mode_or_empty(&self) -> &str {
        self.mode.as_deref().unwrap_or("")
    }

    /// Transit line, or an empty string.
    #[must_use]
    pub fn line_or_empty(&self) -> &str {
        self.line.as_deref().unwrap_or("")
    }
}

/// One geographic record with its hourly counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Feature geometry.
    pub geometry: Geometry,
    /// Feature properties.
    pub properties: FeatureProperties,
}

impl Feature {
    /// Creates a feature.
    #[must_use]
    pub const fn new(geometry: Geometry, properties: FeatureProperties) -> Self {
        Self {
            geometry,
            properties,
        }
    }

    /// Shorthand for [`FeatureProperties::volume_at`].
    #[must_use]
    pub fn volume_at(&self, hour: Hour) -> u64 {
        self.properties.volume_at(hour)
    }
}

/// An ordered, immutable set of features from one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    kind: DatasetKind,
    features: Vec<Feature>,
}

impl FeatureCollection {
    /// Creates a collection.
    #[must_use]
    pub const fn new(kind: DatasetKind, features: Vec<Feature>) -> Self {
        Self { kind, features }
    }

    /// The dataset this collection was loaded from.
    #[must_use]
    pub const fn kind(&self) -> DatasetKind {
        self.kind
    }

    /// Features in source order.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the collection has no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Other(serde::de::IgnoredAny),
}

impl RawCount {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn into_count(self) -> u64 {
        match self {
            Self::Unsigned(value) => value,
            Self::Float(value) if value.is_finite() && value > 0.0 => value.trunc() as u64,
            Self::Signed(_) | Self::Float(_) | Self::Other(_) => 0,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCounts {
    List(Vec<RawCount>),
    Other(serde::de::IgnoredAny),
}

/// Reads `hourly_counts`, mapping `null`, negative and non-numeric
/// entries to zero. Anything that is not an array reads as no counts.
fn lenient_counts<'de, D>(deserializer: D) -> Result<Vec<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawCounts::deserialize(deserializer)? {
        RawCounts::List(raw) => raw.into_iter().map(RawCount::into_count).collect(),
        RawCounts::Other(_) => Vec::new(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawText {
    Text(String),
    Integer(i64),
    Float(f64),
    Other(serde::de::IgnoredAny),
}

/// Reads a text property, stringifying numbers and dropping anything else.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawText::deserialize(deserializer)? {
        RawText::Text(text) => Some(text),
        RawText::Integer(value) => Some(value.to_string()),
        RawText::Float(value) => Some(value.to_string()),
        RawText::Other(_) => None,
    })
}
