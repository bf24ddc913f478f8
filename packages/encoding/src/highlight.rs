//! Opacity overrides used when a comparison bar is clicked.
//!
//! Highlighting dims a whole layer and brightens the features whose
//! representative coordinate lies inside one neighborhood. Unlike
//! aggregation, each box is tested on its own, so a feature inside two
//! overlapping neighborhoods is highlighted for either.

use serde::Serialize;
use traffic_map_feature_models::{DatasetKind, FeatureCollection};
use traffic_map_neighborhood_models::Neighborhood;

use crate::encoder::{TRAFFIC_STROKE_OPACITY, TRANSIT_FILL_OPACITY, TRANSIT_STROKE_OPACITY};

/// Dimmed traffic stroke opacity.
pub const DIMMED_TRAFFIC_STROKE_OPACITY: f64 = 0.15;
/// Dimmed transit fill opacity.
pub const DIMMED_TRANSIT_FILL_OPACITY: f64 = 0.15;
/// Dimmed transit stroke opacity.
pub const DIMMED_TRANSIT_STROKE_OPACITY: f64 = 0.2;
/// Highlighted traffic stroke opacity.
pub const HIGHLIGHTED_TRAFFIC_STROKE_OPACITY: f64 = 0.95;
/// Highlighted transit fill opacity.
pub const HIGHLIGHTED_TRANSIT_FILL_OPACITY: f64 = 0.9;
/// Highlighted transit stroke opacity.
pub const HIGHLIGHTED_TRANSIT_STROKE_OPACITY: f64 = 0.9;

/// Opacity override for one feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureOpacity {
    /// Stroke opacity.
    pub stroke_opacity: f64,
    /// Fill opacity (transit stops only).
    pub fill_opacity: Option<f64>,
}

impl FeatureOpacity {
    const fn dimmed(kind: DatasetKind) -> Self {
        match kind {
            DatasetKind::Traffic => Self {
                stroke_opacity: DIMMED_TRAFFIC_STROKE_OPACITY,
                fill_opacity: None,
            },
            DatasetKind::Transit => Self {
                stroke_opacity: DIMMED_TRANSIT_STROKE_OPACITY,
                fill_opacity: Some(DIMMED_TRANSIT_FILL_OPACITY),
            },
        }
    }

    const fn highlighted(kind: DatasetKind) -> Self {
        match kind {
            DatasetKind::Traffic => Self {
                stroke_opacity: HIGHLIGHTED_TRAFFIC_STROKE_OPACITY,
                fill_opacity: None,
            },
            DatasetKind::Transit => Self {
                stroke_opacity: HIGHLIGHTED_TRANSIT_STROKE_OPACITY,
                fill_opacity: Some(HIGHLIGHTED_TRANSIT_FILL_OPACITY),
            },
        }
    }

    const fn normal(kind: DatasetKind) -> Self {
        match kind {
            DatasetKind::Traffic => Self {
                stroke_opacity: TRAFFIC_STROKE_OPACITY,
                fill_opacity: None,
            },
            DatasetKind::Transit => Self {
                stroke_opacity: TRANSIT_STROKE_OPACITY,
                fill_opacity: Some(TRANSIT_FILL_OPACITY),
            },
        }
    }
}

/// Opacity overrides for every feature of one layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightPass {
    /// Layer the overrides apply to.
    pub kind: DatasetKind,
    /// Neighborhood being highlighted, if any.
    pub neighborhood: Option<String>,
    /// Clicked time bucket, if any. Informational; it does not filter.
    pub bucket_index: Option<usize>,
    /// One override per feature, in collection order.
    pub opacities: Vec<FeatureOpacity>,
    /// Number of features brightened.
    pub highlighted: usize,
}

/// Dims a layer and brightens features inside `neighborhood`.
///
/// With no neighborhood the whole layer is dimmed.
#[must_use]
pub fn highlight_neighborhood(
    collection: &FeatureCollection,
    neighborhood: Option<&Neighborhood>,
    bucket_index: Option<usize>,
) -> HighlightPass {
    let kind = collection.kind();
    let mut highlighted = 0;
    let opacities = collection
        .features()
        .iter()
        .map(|feature| {
            let inside = neighborhood.is_some_and(|nb| {
                feature
                    .geometry
                    .representative_coordinate()
                    .is_some_and(|coord| nb.contains(coord))
            });
            if inside {
                highlighted += 1;
                FeatureOpacity::highlighted(kind)
            } else {
                FeatureOpacity::dimmed(kind)
            }
        })
        .collect();

    HighlightPass {
        kind,
        neighborhood: neighborhood.map(|nb| nb.name().to_string()),
        bucket_index,
        opacities,
        highlighted,
    }
}

/// Restores the default opacities of a layer.
#[must_use]
pub fn reset_highlights(collection: &FeatureCollection) -> HighlightPass {
    let kind = collection.kind();
    HighlightPass {
        kind,
        neighborhood: None,
        bucket_index: None,
        opacities: vec![FeatureOpacity::normal(kind); collection.len()],
        highlighted: 0,
    }
}
