//! Neighborhood comparison of traffic against transit.
//!
//! Both datasets are aggregated once, when they arrive. The view becomes
//! ready when the second one lands; from then on every selection change
//! produces a fresh [`Comparison`] for the chart renderers.

use serde::Serialize;
use traffic_map_feature_models::{DatasetKind, FeatureCollection};
use traffic_map_neighborhood::{AggregationResult, NeighborhoodSet, aggregate};
use traffic_map_time_models::TimeBucket;

/// Bucket sums of one neighborhood for both datasets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    /// Neighborhood name.
    pub neighborhood: String,
    /// Bucket labels, in chart order.
    pub bucket_labels: Vec<String>,
    /// Traffic volume per bucket.
    pub traffic: Vec<u64>,
    /// Transit ridership per bucket.
    pub transit: Vec<u64>,
}

/// Selection and cached aggregates behind the comparison charts.
#[derive(Debug, Clone)]
pub struct CompareView {
    neighborhoods: NeighborhoodSet,
    buckets: Vec<TimeBucket>,
    selected: String,
    traffic: Option<AggregationResult>,
    transit: Option<AggregationResult>,
    ready: bool,
}

impl CompareView {
    /// Selects the first neighborhood of the set.
    #[must_use]
    pub fn new(neighborhoods: NeighborhoodSet, buckets: Vec<TimeBucket>) -> Self {
        let selected = neighborhoods
            .neighborhoods()
            .first()
            .map(|nb| nb.name().to_string())
            .unwrap_or_default();

        Self {
            neighborhoods,
            buckets,
            selected,
            traffic: None,
            transit: None,
            ready: false,
        }
    }

    /// The neighborhood set charts are drawn from.
    #[must_use]
    pub const fn neighborhoods(&self) -> &NeighborhoodSet {
        &self.neighborhoods
    }

    /// Name of the selected neighborhood.
    #[must_use]
    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// Changes the selected neighborhood. Unknown names are kept and
    /// chart as zeros.
    pub fn select(&mut self, name: impl Into<String>) {
        self.selected = name.into();
    }

    /// Whether both datasets have been aggregated.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    /// Aggregates a newly loaded dataset.
    ///
    /// Returns `true` exactly once: on the call that makes both datasets
    /// available.
    pub fn dataset_loaded(&mut self, collection: &FeatureCollection) -> bool {
        let result = aggregate(collection, self.neighborhoods.neighborhoods(), &self.buckets);
        match collection.kind() {
            DatasetKind::Traffic => self.traffic = Some(result),
            DatasetKind::Transit => self.transit = Some(result),
        }

        if self.ready || self.traffic.is_none() || self.transit.is_none() {
            return false;
        }
        self.ready = true;
        true
    }

    /// Sums for the selected neighborhood, once both datasets are in.
    #[must_use]
    pub fn comparison(&self) -> Option<Comparison> {
        let (traffic, transit) = (self.traffic.as_ref()?, self.transit.as_ref()?);
        Some(Comparison {
            neighborhood: self.selected.clone(),
            bucket_labels: self.buckets.iter().map(|b| b.label.clone()).collect(),
            traffic: traffic.sums_or_zero(&self.selected),
            transit: transit.sums_or_zero(&self.selected),
        })
    }
}
