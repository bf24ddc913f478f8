//! Compile-time registry of neighborhood sets.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! Adding a new city requires creating a TOML file in `sets/` and adding
//! a corresponding entry here.

use crate::NeighborhoodSet;

/// Number of registered neighborhood sets. Enforced by a test.
#[cfg(test)]
const EXPECTED_SET_COUNT: usize = 1;

/// Identifier of the set used when none is configured.
pub const DEFAULT_SET_ID: &str = "salt_lake_city";

/// Embedded TOML set definitions.
const SET_TOMLS: &[(&str, &str)] = &[(
    "salt_lake_city",
    include_str!("../sets/salt_lake_city.toml"),
)];

/// Returns all registered neighborhood sets.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse or validate. Since
/// these are compile-time constants, failures indicate a development
/// error and are caught by the tests below.
#[must_use]
pub fn all_sets() -> Vec<NeighborhoodSet> {
    SET_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            NeighborhoodSet::from_toml_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse neighborhood set '{name}': {e}"))
        })
        .collect()
}

/// Returns the registered set with the given identifier.
#[must_use]
pub fn find_set(id: &str) -> Option<NeighborhoodSet> {
    all_sets().into_iter().find(|set| set.id() == id)
}

/// Returns the Salt Lake City set.
///
/// # Panics
///
/// Panics if the embedded default set is missing from the registry.
#[must_use]
pub fn default_set() -> NeighborhoodSet {
    find_set(DEFAULT_SET_ID)
        .unwrap_or_else(|| panic!("Default neighborhood set '{DEFAULT_SET_ID}' is not registered"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use std::collections::BTreeSet;
    use traffic_map_neighborhood_models::Neighborhood;

    #[test]
    fn loads_all_sets() {
        let sets = all_sets();
        assert_eq!(
            sets.len(),
            EXPECTED_SET_COUNT,
            "Expected {EXPECTED_SET_COUNT} neighborhood sets, found {}. \
             Update EXPECTED_SET_COUNT after adding/removing sets.",
            sets.len()
        );
    }

    #[test]
    fn set_ids_are_unique() {
        let mut seen = BTreeSet::new();
        for set in &all_sets() {
            assert!(seen.insert(set.id().to_string()), "Duplicate set ID: {}", set.id());
        }
    }

    #[test]
    fn default_set_is_ordered_downtown_sugar_house_university() {
        let set = default_set();
        let names: Vec<_> = set.neighborhoods().iter().map(Neighborhood::name).collect();
        assert_eq!(names, ["Downtown", "Sugar House", "University"]);
        assert_eq!(set.city(), "Salt Lake City");
    }

    #[test]
    fn downtown_wins_where_it_overlaps_university() {
        let set = default_set();
        let overlap = Coord {
            x: -111.890,
            y: 40.760,
        };
        assert!(set.get("University").unwrap().contains(overlap));
        assert_eq!(set.classify(overlap).map(Neighborhood::name), Some("Downtown"));

        let university_only = Coord {
            x: -111.920,
            y: 40.750,
        };
        assert_eq!(
            set.classify(university_only).map(Neighborhood::name),
            Some("University")
        );
    }
}
