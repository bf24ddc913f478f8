//! Renderers that write to the log instead of a map.

use std::collections::BTreeMap;

use geo::Rect;
use traffic_map_encoding::HighlightPass;
use traffic_map_feature_models::DatasetKind;
use traffic_map_time_models::Hour;
use traffic_map_view::{ChartRenderer, Comparison, MapRenderer, Mode, RenderPass};

/// One-line digest of a paint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintSummary {
    pub kind: DatasetKind,
    pub hour: Hour,
    pub features: usize,
    pub total_volume: u64,
    pub peak_volume: u64,
    /// Feature count per color.
    pub colors: BTreeMap<&'static str, usize>,
}

impl PaintSummary {
    #[must_use]
    pub fn of(pass: &RenderPass) -> Self {
        let mut colors = BTreeMap::new();
        let mut total_volume = 0_u64;
        let mut peak_volume = 0;
        for feature in &pass.features {
            let volume = feature.encoding.volume();
            total_volume = total_volume.saturating_add(volume);
            peak_volume = peak_volume.max(volume);
            *colors.entry(feature.encoding.color().as_str()).or_insert(0) += 1;
        }

        Self {
            kind: pass.kind,
            hour: pass.hour,
            features: pass.features.len(),
            total_volume,
            peak_volume,
            colors,
        }
    }
}

impl std::fmt::Display for PaintSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} @ {}: {} features, volume {} (peak {})",
            self.kind, self.hour, self.features, self.total_volume, self.peak_volume
        )?;
        for (i, (color, count)) in self.colors.iter().enumerate() {
            f.write_str(if i == 0 { "; " } else { ", " })?;
            write!(f, "{color} {count}")?;
        }
        Ok(())
    }
}

/// Logs every map update.
#[derive(Debug, Default)]
pub struct LogRenderer;

impl MapRenderer for LogRenderer {
    fn paint(&mut self, pass: &RenderPass) {
        log::info!("{}", PaintSummary::of(pass));
    }

    fn on_hour_changed(&mut self, hour: Hour) {
        log::debug!("slider -> {}", hour.label());
    }

    fn on_mode_changed(&mut self, mode: Mode) {
        log::info!("showing {mode}");
    }

    fn on_playback_changed(&mut self, playing: bool) {
        log::info!("{}", if playing { "playing" } else { "paused" });
    }

    fn apply_highlight(&mut self, pass: &HighlightPass) {
        log::info!(
            "{} highlight: {} of {} features in {}",
            pass.kind,
            pass.highlighted,
            pass.opacities.len(),
            pass.neighborhood.as_deref().unwrap_or("no neighborhood")
        );
    }

    fn fit_bounds(&mut self, bounds: Rect<f64>) {
        log::info!(
            "fitting map to ({:.4}, {:.4}) - ({:.4}, {:.4})",
            bounds.min().x,
            bounds.min().y,
            bounds.max().x,
            bounds.max().y
        );
    }

    fn on_load_failed(&mut self, kind: DatasetKind, message: &str) {
        log::warn!("{kind} layer unavailable: {message}");
    }
}

/// Logs every comparison chart.
#[derive(Debug, Default)]
pub struct LogChart;

impl ChartRenderer for LogChart {
    fn draw(&mut self, comparison: &Comparison) {
        log::info!("comparison for {}", comparison.neighborhood);
        for (i, label) in comparison.bucket_labels.iter().enumerate() {
            log::info!(
                "  {label:<8} traffic {:>8}  transit {:>6}",
                comparison.traffic.get(i).copied().unwrap_or_default(),
                comparison.transit.get(i).copied().unwrap_or_default()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use traffic_map_feature_models::{Feature, FeatureCollection, FeatureProperties, Geometry};

    fn segment(volume: u64) -> Feature {
        Feature::new(
            Geometry::LineString(vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }]),
            FeatureProperties {
                hourly_counts: vec![volume; 24],
                ..FeatureProperties::default()
            },
        )
    }

    #[test]
    fn total_volume_saturates() {
        let collection = FeatureCollection::new(
            DatasetKind::Traffic,
            vec![segment(u64::MAX - 1), segment(u64::MAX - 1)],
        );
        let pass = RenderPass::build(&collection, Hour::new(8).unwrap(), true);
        let summary = PaintSummary::of(&pass);

        assert_eq!(summary.total_volume, u64::MAX);
        assert_eq!(summary.peak_volume, u64::MAX - 1);
    }

    #[test]
    fn summary_counts_colors_and_volume() {
        let collection = FeatureCollection::new(
            DatasetKind::Traffic,
            vec![segment(100), segment(600), segment(1200), segment(1500)],
        );
        let pass = RenderPass::build(&collection, Hour::new(8).unwrap(), true);
        let summary = PaintSummary::of(&pass);

        assert_eq!(summary.total_volume, 3400);
        assert_eq!(summary.peak_volume, 1500);
        assert_eq!(summary.colors.get("red"), Some(&2));
        assert_eq!(
            summary.to_string(),
            "traffic @ 08:00: 4 features, volume 3400 (peak 1500); orange 1, red 2, yellow 1"
        );
    }
}
