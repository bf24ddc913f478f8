use std::sync::{Arc, Mutex};

use geo::Rect;
use traffic_map_encoding::HighlightPass;
use traffic_map_feature_models::{DatasetKind, Feature, FeatureCollection, FeatureProperties, Geometry};
use traffic_map_time_models::Hour;

use crate::compare::Comparison;
use crate::renderer::{ChartRenderer, MapRenderer, RenderPass};
use crate::state::Mode;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Paint { kind: DatasetKind, hour: u8, features: usize, visible: bool },
    Hour(u8),
    Mode(Mode),
    Playing(bool),
    Visible(DatasetKind, bool),
    Highlight { kind: DatasetKind, highlighted: usize },
    Fit(Rect<f64>),
    Failed(DatasetKind),
}

#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<Event>>>,
    charts: Arc<Mutex<Vec<Comparison>>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn paints(&self) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| matches!(e, Event::Paint { .. }))
            .collect()
    }

    pub fn charts(&self) -> Vec<Comparison> {
        self.charts.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
        self.charts.lock().unwrap().clear();
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl MapRenderer for Recorder {
    fn paint(&mut self, pass: &RenderPass) {
        self.push(Event::Paint {
            kind: pass.kind,
            hour: pass.hour.value(),
            features: pass.features.len(),
            visible: pass.features.iter().all(|f| f.visible),
        });
    }

    fn on_hour_changed(&mut self, hour: Hour) {
        self.push(Event::Hour(hour.value()));
    }

    fn on_mode_changed(&mut self, mode: Mode) {
        self.push(Event::Mode(mode));
    }

    fn on_playback_changed(&mut self, playing: bool) {
        self.push(Event::Playing(playing));
    }

    fn set_layer_visible(&mut self, kind: DatasetKind, visible: bool) {
        self.push(Event::Visible(kind, visible));
    }

    fn apply_highlight(&mut self, pass: &HighlightPass) {
        self.push(Event::Highlight {
            kind: pass.kind,
            highlighted: pass.highlighted,
        });
    }

    fn fit_bounds(&mut self, bounds: Rect<f64>) {
        self.push(Event::Fit(bounds));
    }

    fn on_load_failed(&mut self, kind: DatasetKind, _message: &str) {
        self.push(Event::Failed(kind));
    }
}

impl ChartRenderer for Recorder {
    fn draw(&mut self, comparison: &Comparison) {
        self.charts.lock().unwrap().push(comparison.clone());
    }
}

/// Two features downtown and one in Sugar House, each with a flat
/// hourly profile.
pub fn sample(kind: DatasetKind, per_hour: u64) -> FeatureCollection {
    let at = |x: f64, y: f64| {
        Feature::new(
            Geometry::Point(geo::Coord { x, y }),
            FeatureProperties {
                hourly_counts: vec![per_hour; 24],
                ..FeatureProperties::default()
            },
        )
    };
    FeatureCollection::new(
        kind,
        vec![at(-111.89, 40.76), at(-111.895, 40.765), at(-111.85, 40.745)],
    )
}
