//! Per-feature visual encodings for a selected hour.
//!
//! Visibility is not decided here. Which layer is shown depends on the
//! session's current mode; see the view crate.

use serde::Serialize;
use traffic_map_feature_models::{DatasetKind, Feature, FeatureCollection};
use traffic_map_time_models::Hour;

use crate::color::{Color, resolve_transit_color, resolve_volume_color};

/// Stroke width of a traffic segment.
pub const TRAFFIC_STROKE_WIDTH: f64 = 4.0;
/// Stroke opacity of a traffic segment.
pub const TRAFFIC_STROKE_OPACITY: f64 = 0.8;

/// Smallest transit circle radius.
pub const TRANSIT_MIN_RADIUS: f64 = 5.0;
/// Largest transit circle radius.
pub const TRANSIT_MAX_RADIUS: f64 = 30.0;
/// Riders per pixel of radius.
pub const TRANSIT_RADIUS_DIVISOR: f64 = 10.0;
/// Fill opacity of a transit circle.
pub const TRANSIT_FILL_OPACITY: f64 = 0.5;
/// Stroke opacity of a transit circle.
pub const TRANSIT_STROKE_OPACITY: f64 = 0.9;
/// Stroke width of a transit circle.
pub const TRANSIT_STROKE_WIDTH: f64 = 2.0;

const DEFAULT_LOCATION_TITLE: &str = "Location";
const DEFAULT_STOP_TITLE: &str = "Stop";

/// How a traffic segment is drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficEncoding {
    /// Severity color for the hour's volume.
    pub color: Color,
    /// Stroke width.
    pub width: f64,
    /// Stroke opacity.
    pub opacity: f64,
    /// Volume for the hour.
    pub volume: u64,
    /// Hover text.
    pub tooltip_text: String,
}

/// How a transit stop is drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitEncoding {
    /// Circle radius, clamped to `[5, 30]`.
    pub radius: f64,
    /// Fill and stroke color.
    pub color: Color,
    /// Fill opacity.
    pub fill_opacity: f64,
    /// Stroke opacity.
    pub stroke_opacity: f64,
    /// Stroke width.
    pub stroke_width: f64,
    /// Ridership for the hour.
    pub volume: u64,
    /// Hover text.
    pub tooltip_text: String,
}

/// Either kind of encoding, tagged by layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "layer", rename_all = "lowercase")]
pub enum Encoding {
    /// A traffic segment.
    Traffic(TrafficEncoding),
    /// A transit stop.
    Transit(TransitEncoding),
}

impl Encoding {
    /// Primary color.
    #[must_use]
    pub const fn color(&self) -> Color {
        match self {
            Self::Traffic(e) => e.color,
            Self::Transit(e) => e.color,
        }
    }

    /// Stroke width for segments, radius for stops.
    #[must_use]
    pub const fn size(&self) -> f64 {
        match self {
            Self::Traffic(e) => e.width,
            Self::Transit(e) => e.radius,
        }
    }

    /// Stroke opacity for segments, fill opacity for stops.
    #[must_use]
    pub const fn opacity(&self) -> f64 {
        match self {
            Self::Traffic(e) => e.opacity,
            Self::Transit(e) => e.fill_opacity,
        }
    }

    /// Volume or ridership for the encoded hour.
    #[must_use]
    pub const fn volume(&self) -> u64 {
        match self {
            Self::Traffic(e) => e.volume,
            Self::Transit(e) => e.volume,
        }
    }

    /// Hover text.
    #[must_use]
    pub fn tooltip_text(&self) -> &str {
        match self {
            Self::Traffic(e) => &e.tooltip_text,
            Self::Transit(e) => &e.tooltip_text,
        }
    }
}

/// Encodes a traffic segment for `hour`.
#[must_use]
pub fn encode_traffic_feature(feature: &Feature, hour: Hour) -> TrafficEncoding {
    let volume = feature.volume_at(hour);
    let title = title_or(feature.properties.location.as_deref(), DEFAULT_LOCATION_TITLE);

    TrafficEncoding {
        color: resolve_volume_color(volume),
        width: TRAFFIC_STROKE_WIDTH,
        opacity: TRAFFIC_STROKE_OPACITY,
        volume,
        tooltip_text: format!("{title}\nVolume (this hour): {volume}"),
    }
}

/// Encodes a transit stop for `hour`.
#[must_use]
pub fn encode_transit_feature(feature: &Feature, hour: Hour) -> TransitEncoding {
    let volume = feature.volume_at(hour);
    let mode = feature.properties.mode_or_empty();
    let line = feature.properties.line_or_empty();
    let title = title_or(feature.properties.name.as_deref(), DEFAULT_STOP_TITLE);

    TransitEncoding {
        radius: transit_radius(volume),
        color: resolve_transit_color(mode, line),
        fill_opacity: TRANSIT_FILL_OPACITY,
        stroke_opacity: TRANSIT_STROKE_OPACITY,
        stroke_width: TRANSIT_STROKE_WIDTH,
        volume,
        tooltip_text: format!(
            "{title}\nLine: {line}\nRidership (this hour): {volume}\nMode: {mode}"
        ),
    }
}

/// Encodes a feature according to the dataset it belongs to.
#[must_use]
pub fn encode_feature(kind: DatasetKind, feature: &Feature, hour: Hour) -> Encoding {
    match kind {
        DatasetKind::Traffic => Encoding::Traffic(encode_traffic_feature(feature, hour)),
        DatasetKind::Transit => Encoding::Transit(encode_transit_feature(feature, hour)),
    }
}

/// Encodes every feature of a collection, in order.
#[must_use]
pub fn encode_collection(collection: &FeatureCollection, hour: Hour) -> Vec<Encoding> {
    collection
        .features()
        .iter()
        .map(|feature| encode_feature(collection.kind(), feature, hour))
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn transit_radius(volume: u64) -> f64 {
    (volume as f64 / TRANSIT_RADIUS_DIVISOR).clamp(TRANSIT_MIN_RADIUS, TRANSIT_MAX_RADIUS)
}

/// Empty titles fall back to the default, like missing ones.
fn title_or<'a>(title: Option<&'a str>, default: &'a str) -> &'a str {
    title.filter(|t| !t.is_empty()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use traffic_map_feature_models::{FeatureProperties, Geometry};

    fn hour(value: u8) -> Hour {
        Hour::new(value).unwrap()
    }

    fn stop(volume_at_eight: u64, mode: &str, line: &str) -> Feature {
        let mut hourly_counts = vec![0; 24];
        hourly_counts[8] = volume_at_eight;
        Feature::new(
            Geometry::Point(Coord { x: -111.89, y: 40.76 }),
            FeatureProperties {
                hourly_counts,
                name: Some("Gallivan Plaza".to_string()),
                mode: Some(mode.to_string()),
                line: Some(line.to_string()),
                ..FeatureProperties::default()
            },
        )
    }

    fn segment(counts: Vec<u64>, location: Option<&str>) -> Feature {
        Feature::new(
            Geometry::LineString(vec![Coord { x: -111.89, y: 40.76 }, Coord { x: -111.88, y: 40.76 }]),
            FeatureProperties {
                hourly_counts: counts,
                location: location.map(str::to_string),
                ..FeatureProperties::default()
            },
        )
    }

    #[test]
    fn transit_radius_is_clamped() {
        let cases = [(0, 5.0), (30, 5.0), (80, 8.0), (300, 30.0), (1000, 30.0)];
        for (volume, expected) in cases {
            let encoding = encode_transit_feature(&stop(volume, "Bus", "Bus 9"), hour(8));
            assert!(
                (encoding.radius - expected).abs() < f64::EPSILON,
                "volume {volume}: radius {} != {expected}",
                encoding.radius
            );
        }
    }

    #[test]
    fn transit_encoding_uses_line_color_and_fixed_opacities() {
        let encoding = encode_transit_feature(&stop(120, "TRAX", "Blue Line"), hour(8));
        assert_eq!(encoding.color, Color::new("#2b60bf"));
        assert!((encoding.fill_opacity - 0.5).abs() < f64::EPSILON);
        assert!((encoding.stroke_opacity - 0.9).abs() < f64::EPSILON);
        assert_eq!(encoding.volume, 120);
        assert_eq!(
            encoding.tooltip_text,
            "Gallivan Plaza\nLine: Blue Line\nRidership (this hour): 120\nMode: TRAX"
        );
    }

    #[test]
    fn transit_defaults_when_properties_missing() {
        let feature = Feature::new(Geometry::Other, FeatureProperties::default());
        let encoding = encode_transit_feature(&feature, hour(3));
        assert_eq!(encoding.tooltip_text, "Stop\nLine: \nRidership (this hour): 0\nMode: ");
        assert!((encoding.radius - TRANSIT_MIN_RADIUS).abs() < f64::EPSILON);
    }

    #[test]
    fn traffic_encoding_reads_the_selected_hour() {
        let feature = segment(vec![100, 700, 1500], Some("North Temple"));

        let low = encode_traffic_feature(&feature, hour(0));
        assert_eq!(low.color, Color::new("yellow"));
        let medium = encode_traffic_feature(&feature, hour(1));
        assert_eq!(medium.color, Color::new("orange"));
        let high = encode_traffic_feature(&feature, hour(2));
        assert_eq!(high.color, Color::new("red"));
        assert_eq!(high.tooltip_text, "North Temple\nVolume (this hour): 1500");

        let missing = encode_traffic_feature(&feature, hour(20));
        assert_eq!(missing.volume, 0);
        assert_eq!(missing.color, Color::new("yellow"));
        assert!((missing.width - 4.0).abs() < f64::EPSILON);
        assert!((missing.opacity - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn traffic_title_falls_back_for_missing_or_empty_location() {
        let none = encode_traffic_feature(&segment(vec![], None), hour(8));
        assert_eq!(none.tooltip_text, "Location\nVolume (this hour): 0");
        let empty = encode_traffic_feature(&segment(vec![], Some("")), hour(8));
        assert_eq!(empty.tooltip_text, "Location\nVolume (this hour): 0");
    }

    #[test]
    fn encoding_is_idempotent() {
        let feature = stop(420, "Commuter Rail", "FrontRunner");
        let first = encode_feature(DatasetKind::Transit, &feature, hour(8));
        let second = encode_feature(DatasetKind::Transit, &feature, hour(8));
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn collection_encoding_follows_dataset_kind() {
        let collection = FeatureCollection::new(
            DatasetKind::Traffic,
            vec![segment(vec![0; 24], None), segment(vec![2000; 24], None)],
        );
        let encodings = encode_collection(&collection, hour(12));
        assert_eq!(encodings.len(), 2);
        assert!(matches!(encodings[0], Encoding::Traffic(_)));
        assert_eq!(encodings[1].color(), Color::new("red"));
        assert!((encodings[1].size() - TRAFFIC_STROKE_WIDTH).abs() < f64::EPSILON);
    }
}
