//! Synchronous core of a map session.
//!
//! Everything that changes what is drawn goes through one of the
//! methods here: slider input and playback ticks both call
//! [`ViewController::set_hour`], the mode toggle calls
//! [`ViewController::switch_mode`], and finished loads call
//! [`ViewController::data_loaded`]. A dataset that has not arrived yet is
//! simply not drawn; it is painted as soon as it lands if its mode is
//! active.

use geo::Rect;
use traffic_map_encoding::{HighlightPass, highlight_neighborhood, reset_highlights};
use traffic_map_feature_models::{DatasetKind, FeatureCollection};
use traffic_map_time_models::{Hour, TimeBucket};

use crate::ViewError;
use crate::compare::CompareView;
use crate::config::ViewConfig;
use crate::renderer::{ChartRenderer, MapRenderer, RenderPass};
use crate::state::{Mode, ViewState};

/// Owns the view state and loaded datasets, and drives the renderers.
pub struct ViewController {
    state: ViewState,
    traffic: Option<FeatureCollection>,
    transit: Option<FeatureCollection>,
    compare: CompareView,
    renderers: Vec<Box<dyn MapRenderer>>,
    charts: Vec<Box<dyn ChartRenderer>>,
}

impl std::fmt::Debug for ViewController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewController")
            .field("state", &self.state)
            .field("traffic", &self.traffic.as_ref().map(FeatureCollection::len))
            .field("transit", &self.transit.as_ref().map(FeatureCollection::len))
            .field("renderers", &self.renderers.len())
            .field("charts", &self.charts.len())
            .finish_non_exhaustive()
    }
}

impl ViewController {
    /// Creates a controller with no datasets and no renderers.
    #[must_use]
    pub const fn new(state: ViewState, compare: CompareView) -> Self {
        Self {
            state,
            traffic: None,
            transit: None,
            compare,
            renderers: Vec::new(),
            charts: Vec::new(),
        }
    }

    /// Creates a controller from configuration, using the default time
    /// buckets for comparison.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] if the neighborhood set cannot be loaded.
    pub fn from_config(config: &ViewConfig) -> Result<Self, ViewError> {
        let compare = CompareView::new(config.neighborhood_set()?, TimeBucket::defaults());
        Ok(Self::new(config.initial_state(), compare))
    }

    /// Registers a map renderer. It is told which layer is visible right
    /// away and painted if the active dataset is already loaded.
    pub fn add_renderer(&mut self, mut renderer: Box<dyn MapRenderer>) {
        for &kind in DatasetKind::all() {
            renderer.set_layer_visible(kind, self.state.is_visible(kind));
        }
        if let Some(pass) = self.active_pass() {
            renderer.paint(&pass);
        }
        self.renderers.push(renderer);
    }

    /// Registers a chart renderer.
    pub fn add_chart(&mut self, chart: Box<dyn ChartRenderer>) {
        self.charts.push(chart);
    }

    /// Current mode, hour, and playback flag.
    #[must_use]
    pub const fn state(&self) -> ViewState {
        self.state
    }

    /// The loaded dataset of a kind, if it has arrived.
    #[must_use]
    pub const fn collection(&self, kind: DatasetKind) -> Option<&FeatureCollection> {
        match kind {
            DatasetKind::Traffic => self.traffic.as_ref(),
            DatasetKind::Transit => self.transit.as_ref(),
        }
    }

    /// Comparison state.
    #[must_use]
    pub const fn compare(&self) -> &CompareView {
        &self.compare
    }

    /// Selects an hour and re-encodes the active layer.
    pub fn set_hour(&mut self, hour: Hour) {
        self.state.current_hour = hour;
        log::debug!("Hour set to {hour}");
        for renderer in &mut self.renderers {
            renderer.on_hour_changed(hour);
        }
        self.render_active();
    }

    /// Moves to the next hour, wrapping 23 to 0.
    pub fn advance_hour(&mut self) {
        self.set_hour(self.state.current_hour.wrapping_next());
    }

    /// Shows `mode`'s layer, hides the other, and paints the shown one if
    /// its data has arrived.
    pub fn switch_mode(&mut self, mode: Mode) {
        self.state.mode = mode;
        log::debug!("Mode switched to {mode}");
        for renderer in &mut self.renderers {
            renderer.on_mode_changed(mode);
            for &kind in DatasetKind::all() {
                renderer.set_layer_visible(kind, kind == mode);
            }
        }
        self.render_active();
    }

    /// Updates the playback flag. Returns whether it changed.
    pub fn set_playing(&mut self, playing: bool) -> bool {
        if self.state.playing == playing {
            return false;
        }
        self.state.playing = playing;
        for renderer in &mut self.renderers {
            renderer.on_playback_changed(playing);
        }
        true
    }

    /// Stores a loaded dataset.
    ///
    /// The dataset is painted immediately when its mode is active, and the
    /// comparison charts are drawn when this completes the pair.
    pub fn data_loaded(&mut self, collection: FeatureCollection) {
        let kind = collection.kind();
        log::info!("{kind} data ready ({} features)", collection.len());

        let ready = self.compare.dataset_loaded(&collection);
        match kind {
            DatasetKind::Traffic => self.traffic = Some(collection),
            DatasetKind::Transit => self.transit = Some(collection),
        }

        if kind == self.state.mode {
            self.render_active();
        }
        if ready {
            self.draw_charts();
        }
    }

    /// Reports a dataset that could not be loaded. Its layer stays empty;
    /// the rest of the session keeps working.
    pub fn load_failed(&mut self, kind: DatasetKind, message: &str) {
        log::error!("Failed to load {kind} data: {message}");
        for renderer in &mut self.renderers {
            renderer.on_load_failed(kind, message);
        }
    }

    /// Fits every map to the city boundary.
    pub fn boundary_loaded(&mut self, bounds: Rect<f64>) {
        for renderer in &mut self.renderers {
            renderer.fit_bounds(bounds);
        }
    }

    /// Changes the compared neighborhood, clears highlights, and redraws
    /// the charts.
    pub fn select_neighborhood(&mut self, name: &str) {
        log::debug!("Comparing neighborhood {name}");
        self.compare.select(name);
        self.reset_highlights();
        self.draw_charts();
    }

    /// Highlights the selected neighborhood's features on the `kind` layer
    /// and dims every loaded layer otherwise.
    pub fn highlight_bucket(&mut self, kind: DatasetKind, bucket_index: usize) {
        let neighborhood = self
            .compare
            .neighborhoods()
            .get(self.compare.selected());

        let passes: Vec<HighlightPass> = DatasetKind::all()
            .iter()
            .filter_map(|&layer| {
                let collection = self.collection(layer)?;
                Some(if layer == kind {
                    highlight_neighborhood(collection, neighborhood, Some(bucket_index))
                } else {
                    highlight_neighborhood(collection, None, None)
                })
            })
            .collect();

        self.apply_highlights(&passes);
    }

    /// Restores default opacities on every loaded layer.
    pub fn reset_highlights(&mut self) {
        let passes: Vec<HighlightPass> = DatasetKind::all()
            .iter()
            .filter_map(|&kind| self.collection(kind).map(reset_highlights))
            .collect();

        self.apply_highlights(&passes);
    }

    fn apply_highlights(&mut self, passes: &[HighlightPass]) {
        for renderer in &mut self.renderers {
            for pass in passes {
                renderer.apply_highlight(pass);
            }
        }
    }

    fn active_pass(&self) -> Option<RenderPass> {
        self.collection(self.state.mode)
            .map(|collection| RenderPass::build(collection, self.state.current_hour, true))
    }

    fn render_active(&mut self) {
        let Some(pass) = self.active_pass() else {
            log::debug!("{} data not loaded yet; nothing to paint", self.state.mode);
            return;
        };
        for renderer in &mut self.renderers {
            renderer.paint(&pass);
        }
    }

    fn draw_charts(&mut self) {
        let Some(comparison) = self.compare.comparison() else {
            return;
        };
        for chart in &mut self.charts {
            chart.draw(&comparison);
        }
    }
}
