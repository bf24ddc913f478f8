//! Per-neighborhood, per-time-bucket sums of hourly counts.

use serde::Serialize;
use traffic_map_feature_models::FeatureCollection;
use traffic_map_neighborhood_models::Neighborhood;
use traffic_map_time_models::TimeBucket;

use crate::classify;

/// Bucket sums for one neighborhood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborhoodTotals {
    /// Neighborhood name.
    pub name: String,
    /// One sum per time bucket, in bucket order.
    pub sums: Vec<u64>,
}

/// Result of [`aggregate`]: every neighborhood, in set order, with one
/// sum per bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    /// Bucket labels, matching the order of every `sums` vector.
    pub bucket_labels: Vec<String>,
    /// Totals per neighborhood, in classification order.
    pub totals: Vec<NeighborhoodTotals>,
    /// Features that fell inside a neighborhood.
    pub classified: usize,
    /// Features outside every neighborhood (or without a usable
    /// coordinate). These contribute to no sum.
    pub unclassified: usize,
}

impl AggregationResult {
    /// Bucket sums for a neighborhood, by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[u64]> {
        self.totals
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.sums.as_slice())
    }

    /// Bucket sums for a neighborhood, or all zeros when the name is
    /// unknown.
    #[must_use]
    pub fn sums_or_zero(&self, name: &str) -> Vec<u64> {
        self.get(name)
            .map_or_else(|| vec![0; self.bucket_labels.len()], <[u64]>::to_vec)
    }

    /// Sum of every bucket of every neighborhood.
    #[must_use]
    pub fn grand_total(&self) -> u64 {
        self.totals
            .iter()
            .flat_map(|t| t.sums.iter())
            .fold(0_u64, |acc, sum| acc.saturating_add(*sum))
    }
}

/// Sums hourly counts by neighborhood and time bucket.
///
/// Each feature is placed by its representative coordinate into the
/// first neighborhood whose box contains it; features outside every box
/// are skipped. For the matched neighborhood, every bucket adds the
/// feature's counts over that bucket's hours (missing hours count as 0).
/// Neighborhoods with no features still appear, with zero sums.
/// Sums saturate at `u64::MAX`.
#[must_use]
pub fn aggregate(
    collection: &FeatureCollection,
    neighborhoods: &[Neighborhood],
    buckets: &[TimeBucket],
) -> AggregationResult {
    let mut totals: Vec<NeighborhoodTotals> = neighborhoods
        .iter()
        .map(|nb| NeighborhoodTotals {
            name: nb.name().to_string(),
            sums: vec![0; buckets.len()],
        })
        .collect();
    let mut classified = 0;
    let mut unclassified = 0;

    for feature in collection.features() {
        let slot = feature
            .geometry
            .representative_coordinate()
            .and_then(|coord| classify(neighborhoods, coord))
            .and_then(|nb| totals.iter_mut().find(|t| t.name == nb.name()));

        let Some(slot) = slot else {
            unclassified += 1;
            continue;
        };
        classified += 1;

        for (sum, bucket) in slot.sums.iter_mut().zip(buckets) {
            let bucket_sum = bucket
                .hours
                .iter()
                .map(|hour| feature.volume_at(*hour))
                .fold(0_u64, u64::saturating_add);
            *sum = sum.saturating_add(bucket_sum);
        }
    }

    log::debug!(
        "Aggregated {} {} features: {classified} classified, {unclassified} outside all neighborhoods",
        collection.len(),
        collection.kind(),
    );

    AggregationResult {
        bucket_labels: buckets.iter().map(|b| b.label.clone()).collect(),
        totals,
        classified,
        unclassified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::default_set;
    use geo::Coord;
    use traffic_map_feature_models::{DatasetKind, Feature, FeatureProperties, Geometry};
    use traffic_map_time_models::Hour;

    fn props(counts: Vec<u64>) -> FeatureProperties {
        FeatureProperties {
            hourly_counts: counts,
            ..FeatureProperties::default()
        }
    }

    fn stop(x: f64, y: f64, counts: Vec<u64>) -> Feature {
        Feature::new(Geometry::Point(Coord { x, y }), props(counts))
    }

    fn ones() -> Vec<u64> {
        vec![1; 24]
    }

    #[test]
    fn neighborhoods_without_features_are_zero() {
        let set = default_set();
        let empty = FeatureCollection::new(DatasetKind::Transit, vec![]);
        let result = aggregate(&empty, set.neighborhoods(), &TimeBucket::defaults());

        assert_eq!(result.bucket_labels, ["Morning", "Midday", "Evening"]);
        assert_eq!(result.totals.len(), 3);
        for totals in &result.totals {
            assert_eq!(totals.sums, vec![0, 0, 0]);
        }
    }

    #[test]
    fn each_bucket_sums_its_five_hours() {
        let set = default_set();
        let counts: Vec<u64> = (0..24).collect();
        let collection =
            FeatureCollection::new(DatasetKind::Transit, vec![stop(-111.85, 40.745, counts)]);
        let result = aggregate(&collection, set.neighborhoods(), &TimeBucket::defaults());

        // 6+7+8+9+10, 11+..+15, 16+..+20
        assert_eq!(result.get("Sugar House"), Some(&[40, 65, 90][..]));
        assert_eq!(result.get("Downtown"), Some(&[0, 0, 0][..]));
        assert_eq!(result.classified, 1);
    }

    #[test]
    fn boundary_points_are_included() {
        let set = default_set();
        let collection = FeatureCollection::new(
            DatasetKind::Transit,
            vec![stop(-111.870, 40.735, ones()), stop(-111.820, 40.760, ones())],
        );
        let result = aggregate(&collection, set.neighborhoods(), &TimeBucket::defaults());
        assert_eq!(result.get("Sugar House"), Some(&[10, 10, 10][..]));
        assert_eq!(result.unclassified, 0);
    }

    #[test]
    fn outside_points_are_dropped_silently() {
        let set = default_set();
        let collection = FeatureCollection::new(
            DatasetKind::Transit,
            vec![stop(-112.5, 41.2, ones()), stop(-111.89, 40.76, ones())],
        );
        let result = aggregate(&collection, set.neighborhoods(), &TimeBucket::defaults());
        assert_eq!(result.unclassified, 1);
        assert_eq!(result.get("Downtown"), Some(&[5, 5, 5][..]));
        assert_eq!(result.grand_total(), 15);
    }

    #[test]
    fn overlap_goes_to_first_neighborhood_only() {
        let set = default_set();
        let collection =
            FeatureCollection::new(DatasetKind::Transit, vec![stop(-111.89, 40.76, ones())]);
        let result = aggregate(&collection, set.neighborhoods(), &TimeBucket::defaults());
        assert_eq!(result.get("Downtown"), Some(&[5, 5, 5][..]));
        assert_eq!(result.get("University"), Some(&[0, 0, 0][..]));
    }

    #[test]
    fn lines_are_placed_by_middle_vertex() {
        let set = default_set();
        // Vertex 2 of 4 sits downtown; the others are far outside.
        let line = Feature::new(
            Geometry::LineString(vec![
                Coord { x: -113.0, y: 42.0 },
                Coord { x: -113.0, y: 42.0 },
                Coord { x: -111.89, y: 40.76 },
                Coord { x: -110.0, y: 39.0 },
            ]),
            props(ones()),
        );
        let collection = FeatureCollection::new(DatasetKind::Traffic, vec![line]);
        let result = aggregate(&collection, set.neighborhoods(), &TimeBucket::defaults());
        assert_eq!(result.get("Downtown"), Some(&[5, 5, 5][..]));
    }

    #[test]
    fn huge_counts_saturate_instead_of_overflowing() {
        let set = default_set();
        let mut counts = vec![0; 24];
        counts[6] = u64::MAX - 1;
        counts[7] = u64::MAX - 1;
        let collection = FeatureCollection::new(
            DatasetKind::Traffic,
            vec![
                stop(-111.89, 40.76, counts.clone()),
                stop(-111.89, 40.76, counts),
            ],
        );
        let result = aggregate(&collection, set.neighborhoods(), &TimeBucket::defaults());
        assert_eq!(result.get("Downtown"), Some(&[u64::MAX, 0, 0][..]));
        assert_eq!(result.grand_total(), u64::MAX);
    }

    #[test]
    fn missing_geometry_and_short_counts_do_not_error() {
        let set = default_set();
        let collection = FeatureCollection::new(
            DatasetKind::Traffic,
            vec![
                Feature::new(Geometry::Other, props(ones())),
                Feature::new(Geometry::LineString(vec![]), props(ones())),
                stop(-111.89, 40.76, vec![100; 8]),
            ],
        );
        let result = aggregate(&collection, set.neighborhoods(), &TimeBucket::defaults());
        assert_eq!(result.unclassified, 2);
        // Only hours 6 and 7 exist.
        assert_eq!(result.get("Downtown"), Some(&[200, 0, 0][..]));
    }

    #[test]
    fn grand_total_matches_covered_hours_of_classified_features() {
        let set = default_set();
        let features: Vec<Feature> = (0..30)
            .map(|i| {
                let i = f64::from(i);
                let counts = (0..24).map(|h| h * 3 + 1).collect();
                stop(-111.93 + i * 0.004, 40.74 + i * 0.001, counts)
            })
            .collect();
        let collection = FeatureCollection::new(DatasetKind::Transit, features);
        let buckets = TimeBucket::defaults();
        let result = aggregate(&collection, set.neighborhoods(), &buckets);

        let expected: u64 = collection
            .features()
            .iter()
            .filter(|f| {
                f.geometry
                    .representative_coordinate()
                    .and_then(|c| set.classify(c))
                    .is_some()
            })
            .map(|f| {
                Hour::all()
                    .filter(|h| (6..=20).contains(&h.value()))
                    .map(|h| f.volume_at(h))
                    .sum::<u64>()
            })
            .sum();

        assert!(result.classified > 0 && result.unclassified > 0);
        assert_eq!(result.grand_total(), expected);
    }

    #[test]
    fn unknown_neighborhood_reads_as_zero() {
        let set = default_set();
        let empty = FeatureCollection::new(DatasetKind::Traffic, vec![]);
        let result = aggregate(&empty, set.neighborhoods(), &TimeBucket::defaults());
        assert_eq!(result.get("Rose Park"), None);
        assert_eq!(result.sums_or_zero("Rose Park"), vec![0, 0, 0]);
    }

    #[test]
    fn aggregation_does_not_touch_the_collection() {
        let set = default_set();
        let collection =
            FeatureCollection::new(DatasetKind::Transit, vec![stop(-111.89, 40.76, ones())]);
        let before = collection.clone();
        let first = aggregate(&collection, set.neighborhoods(), &TimeBucket::defaults());
        let second = aggregate(&collection, set.neighborhoods(), &TimeBucket::defaults());
        assert_eq!(first, second);
        assert_eq!(collection, before);
    }
}
