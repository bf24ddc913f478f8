//! Collaborators that draw what the controller decides.
//!
//! The map and chart renderers are traits so the same session can drive
//! a browser bridge, a terminal log, or a test recorder.

use geo::Rect;
use serde::Serialize;
use traffic_map_encoding::{Encoding, HighlightPass, encode_collection};
use traffic_map_feature_models::{DatasetKind, FeatureCollection};
use traffic_map_time_models::Hour;

use crate::compare::Comparison;
use crate::state::Mode;

/// One feature's encoding within a [`RenderPass`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedFeature {
    /// Index of the feature in its collection.
    pub index: usize,
    /// Visual encoding for the pass hour.
    pub encoding: Encoding,
    /// Whether the feature's layer is shown.
    pub visible: bool,
}

/// Encodings of a whole layer for one hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPass {
    /// Layer being painted.
    pub kind: DatasetKind,
    /// Hour the encodings were computed for.
    pub hour: Hour,
    /// One entry per feature, in collection order.
    pub features: Vec<EncodedFeature>,
}

impl RenderPass {
    /// Encodes every feature of `collection` for `hour`.
    #[must_use]
    pub fn build(collection: &FeatureCollection, hour: Hour, visible: bool) -> Self {
        let features = encode_collection(collection, hour)
            .into_iter()
            .enumerate()
            .map(|(index, encoding)| EncodedFeature {
                index,
                encoding,
                visible,
            })
            .collect();

        Self {
            kind: collection.kind(),
            hour,
            features,
        }
    }
}

/// Receives map updates. Only [`MapRenderer::paint`] is required.
pub trait MapRenderer: Send {
    /// Draws a freshly encoded layer.
    fn paint(&mut self, pass: &RenderPass);

    /// The selected hour changed.
    fn on_hour_changed(&mut self, _hour: Hour) {}

    /// The displayed dataset changed.
    fn on_mode_changed(&mut self, _mode: Mode) {}

    /// Playback started or stopped.
    fn on_playback_changed(&mut self, _playing: bool) {}

    /// Shows or hides a layer.
    fn set_layer_visible(&mut self, _kind: DatasetKind, _visible: bool) {}

    /// Applies opacity overrides from the compare view.
    fn apply_highlight(&mut self, _pass: &HighlightPass) {}

    /// Fits the viewport to the city boundary.
    fn fit_bounds(&mut self, _bounds: Rect<f64>) {}

    /// A dataset could not be loaded. Its layer stays empty.
    fn on_load_failed(&mut self, _kind: DatasetKind, _message: &str) {}
}

/// Receives comparison charts.
pub trait ChartRenderer: Send {
    /// Draws the bucket sums of one neighborhood for both datasets.
    fn draw(&mut self, comparison: &Comparison);
}
