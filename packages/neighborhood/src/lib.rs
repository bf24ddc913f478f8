#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Neighborhood sets, point classification, and time-bucket aggregation.
//!
//! A [`NeighborhoodSet`] is a small, ordered list of named bounding
//! boxes. Sets are defined as TOML files embedded at compile time (see
//! [`registry`]) or loaded from disk. [`aggregate()`] sums each feature's
//! hourly counts into per-neighborhood, per-bucket totals for the
//! comparison dashboard.

pub mod aggregate;
pub mod registry;

use std::collections::BTreeSet;
use std::path::Path;

use geo::Coord;
use thiserror::Error;
use traffic_map_neighborhood_models::{InvalidBoundsError, Neighborhood, NeighborhoodSetDefinition};

pub use aggregate::{AggregationResult, NeighborhoodTotals, aggregate};

/// Errors that can occur while building a neighborhood set.
#[derive(Debug, Error)]
pub enum NeighborhoodError {
    /// Reading a set file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The set file is not valid TOML for the set schema.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A neighborhood's edges do not form a box.
    #[error(transparent)]
    InvalidBounds(#[from] InvalidBoundsError),

    /// Two neighborhoods share a name.
    #[error("Duplicate neighborhood '{name}' in set '{set}'")]
    DuplicateName {
        /// Set identifier.
        set: String,
        /// The repeated name.
        name: String,
    },

    /// The set defines no neighborhoods.
    #[error("Neighborhood set '{set}' is empty")]
    Empty {
        /// Set identifier.
        set: String,
    },
}

/// An ordered, validated list of neighborhoods for one city.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborhoodSet {
    id: String,
    city: String,
    neighborhoods: Vec<Neighborhood>,
}

impl NeighborhoodSet {
    /// Validates a set definition.
    ///
    /// # Errors
    ///
    /// Returns [`NeighborhoodError`] if the set is empty, a name repeats,
    /// or any box is inverted.
    pub fn from_definition(def: &NeighborhoodSetDefinition) -> Result<Self, NeighborhoodError> {
        if def.neighborhoods.is_empty() {
            return Err(NeighborhoodError::Empty {
                set: def.id.clone(),
            });
        }

        let mut seen = BTreeSet::new();
        let mut neighborhoods = Vec::with_capacity(def.neighborhoods.len());
        for nb in &def.neighborhoods {
            if !seen.insert(nb.name.as_str()) {
                return Err(NeighborhoodError::DuplicateName {
                    set: def.id.clone(),
                    name: nb.name.clone(),
                });
            }
            neighborhoods.push(Neighborhood::try_from(nb)?);
        }

        Ok(Self {
            id: def.id.clone(),
            city: def.city.clone(),
            neighborhoods,
        })
    }

    /// Parses and validates a set from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`NeighborhoodError`] if the TOML is malformed or the set
    /// fails validation.
    pub fn from_toml_str(text: &str) -> Result<Self, NeighborhoodError> {
        let def: NeighborhoodSetDefinition = toml::from_str(text)?;
        Self::from_definition(&def)
    }

    /// Reads a set from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`NeighborhoodError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, NeighborhoodError> {
        let text = std::fs::read_to_string(path)?;
        let set = Self::from_toml_str(&text)?;
        log::info!(
            "Loaded {} neighborhoods for {} from {}",
            set.neighborhoods.len(),
            set.city,
            path.display()
        );
        Ok(set)
    }

    /// Set identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// City name.
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Neighborhoods in classification order.
    #[must_use]
    pub fn neighborhoods(&self) -> &[Neighborhood] {
        &self.neighborhoods
    }

    /// Looks up a neighborhood by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Neighborhood> {
        self.neighborhoods.iter().find(|nb| nb.name() == name)
    }

    /// The first neighborhood whose box contains `coord`.
    #[must_use]
    pub fn classify(&self, coord: Coord<f64>) -> Option<&Neighborhood> {
        classify(&self.neighborhoods, coord)
    }
}

/// The first neighborhood in `neighborhoods` whose box contains `coord`.
///
/// Overlapping boxes are resolved by list order.
#[must_use]
pub fn classify(neighborhoods: &[Neighborhood], coord: Coord<f64>) -> Option<&Neighborhood> {
    neighborhoods.iter().find(|nb| nb.contains(coord))
}

#[cfg(test)]
mod tests {
    use super::*;

    const OVERLAPPING: &str = r#"
        id = "test"
        city = "Test City"
        state = "UT"

        [[neighborhoods]]
        name = "First"
        min_lon = 0.0
        max_lon = 10.0
        min_lat = 0.0
        max_lat = 10.0

        [[neighborhoods]]
        name = "Second"
        min_lon = 5.0
        max_lon = 15.0
        min_lat = 5.0
        max_lat = 15.0
    "#;

    #[test]
    fn first_matching_box_wins() {
        let set = NeighborhoodSet::from_toml_str(OVERLAPPING).unwrap();
        let overlap = Coord { x: 7.0, y: 7.0 };
        assert_eq!(set.classify(overlap).map(Neighborhood::name), Some("First"));
        let only_second = Coord { x: 12.0, y: 12.0 };
        assert_eq!(set.classify(only_second).map(Neighborhood::name), Some("Second"));
        assert!(set.classify(Coord { x: 20.0, y: 20.0 }).is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let text = OVERLAPPING.replace("\"Second\"", "\"First\"");
        assert!(matches!(
            NeighborhoodSet::from_toml_str(&text),
            Err(NeighborhoodError::DuplicateName { name, .. }) if name == "First"
        ));
    }

    #[test]
    fn inverted_boxes_are_rejected() {
        let text = OVERLAPPING.replace("max_lon = 15.0", "max_lon = 1.0");
        assert!(matches!(
            NeighborhoodSet::from_toml_str(&text),
            Err(NeighborhoodError::InvalidBounds(e)) if e.name == "Second"
        ));
    }

    #[test]
    fn empty_sets_are_rejected() {
        let text = "id = \"none\"\ncity = \"Nowhere\"\nstate = \"UT\"\nneighborhoods = []\n";
        assert!(matches!(
            NeighborhoodSet::from_toml_str(text),
            Err(NeighborhoodError::Empty { .. })
        ));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(matches!(
            NeighborhoodSet::from_toml_str("id = "),
            Err(NeighborhoodError::Toml(_))
        ));
    }
}
