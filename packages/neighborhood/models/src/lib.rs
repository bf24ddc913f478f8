#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Neighborhood bounding-box types and set definition schema.
//!
//! Defines the TOML schema for a city's neighborhood set and the
//! validated [`Neighborhood`] type used for point classification. Each
//! neighborhood is an axis-aligned box; containment is inclusive on all
//! four edges.

use geo::{Coord, Intersects, Rect};
use serde::{Deserialize, Serialize};

/// A neighborhood set for one city, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighborhoodSetDefinition {
    /// Unique set identifier (e.g., `"salt_lake_city"`).
    pub id: String,
    /// City name.
    pub city: String,
    /// Two-letter state abbreviation.
    pub state: String,
    /// Neighborhoods in classification order.
    pub neighborhoods: Vec<NeighborhoodDefinition>,
}

/// A single neighborhood box as written in TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborhoodDefinition {
    /// Human-readable neighborhood name.
    pub name: String,
    /// Western edge (longitude).
    pub min_lon: f64,
    /// Eastern edge (longitude).
    pub max_lon: f64,
    /// Southern edge (latitude).
    pub min_lat: f64,
    /// Northern edge (latitude).
    pub max_lat: f64,
}

/// A named, validated neighborhood bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighborhood {
    name: String,
    bounds: Rect<f64>,
}

impl Neighborhood {
    /// Creates a neighborhood from its edges.
    ///
    /// # Errors
    ///
    /// Returns an error if either minimum exceeds its maximum or any edge
    /// is not finite.
    pub fn new(
        name: impl Into<String>,
        min_lon: f64,
        max_lon: f64,
        min_lat: f64,
        max_lat: f64,
    ) -> Result<Self, InvalidBoundsError> {
        let name = name.into();
        let finite = [min_lon, max_lon, min_lat, max_lat]
            .iter()
            .all(|v| v.is_finite());
        if !finite || min_lon > max_lon || min_lat > max_lat {
            return Err(InvalidBoundsError { name });
        }

        Ok(Self {
            name,
            bounds: Rect::new(
                Coord {
                    x: min_lon,
                    y: min_lat,
                },
                Coord {
                    x: max_lon,
                    y: max_lat,
                },
            ),
        })
    }

    /// Returns the neighborhood name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the bounding box.
    #[must_use]
    pub const fn bounds(&self) -> Rect<f64> {
        self.bounds
    }

    /// Whether `coord` lies inside the box, edges included.
    #[must_use]
    pub fn contains(&self, coord: Coord<f64>) -> bool {
        self.bounds.intersects(&coord)
    }
}

impl TryFrom<&NeighborhoodDefinition> for Neighborhood {
    type Error = InvalidBoundsError;

    fn try_from(def: &NeighborhoodDefinition) -> Result<Self, Self::Error> {
        Self::new(
            def.name.clone(),
            def.min_lon,
            def.max_lon,
            def.min_lat,
            def.max_lat,
        )
    }
}

/// Error returned when a neighborhood's edges do not form a box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidBoundsError {
    /// Name of the offending neighborhood.
    pub name: String,
}

impl std::fmt::Display for InvalidBoundsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid bounds for neighborhood '{}': minimums must not exceed maximums",
            self.name
        )
    }
}

impl std::error::Error for InvalidBoundsError {}
