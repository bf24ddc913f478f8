//! Converts `GeoJSON` documents into [`FeatureCollection`]s.

use geo::{BoundingRect, Coord, Rect};
use geojson::{GeoJson, Value};
use traffic_map_feature_models::{
    DatasetKind, Feature, FeatureCollection, FeatureProperties, Geometry,
};

use crate::LoadError;

/// Parses a `GeoJSON` `FeatureCollection` document.
///
/// Every feature is kept, in source order, even when its geometry or
/// properties are unusable, so indices line up with the source document.
///
/// # Errors
///
/// Returns [`LoadError`] if the text is not `GeoJSON` or the top-level
/// object is not a `FeatureCollection`.
pub fn parse_collection(kind: DatasetKind, text: &str) -> Result<FeatureCollection, LoadError> {
    let geojson: GeoJson = text.parse()?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(LoadError::NotAFeatureCollection {
            found: type_name(&geojson),
        });
    };

    let features: Vec<Feature> = collection.features.into_iter().map(convert_feature).collect();

    let unplaced = features
        .iter()
        .filter(|f| f.geometry.representative_coordinate().is_none())
        .count();
    if unplaced > 0 {
        log::debug!("{unplaced} {kind} features have no usable geometry");
    }

    Ok(FeatureCollection::new(kind, features))
}

/// Parses a city boundary document and returns its bounding box.
///
/// Accepts a bare geometry, a single feature, or a feature collection.
///
/// # Errors
///
/// Returns [`LoadError`] if the text is not `GeoJSON` or contains no
/// geometry with a bounding box.
pub fn parse_boundary(text: &str) -> Result<Rect<f64>, LoadError> {
    let geojson: GeoJson = text.parse()?;
    let geometries: Vec<geojson::Geometry> = match geojson {
        GeoJson::Geometry(geometry) => vec![geometry],
        GeoJson::Feature(feature) => feature.geometry.into_iter().collect(),
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .filter_map(|f| f.geometry)
            .collect(),
    };

    geometries
        .into_iter()
        .filter_map(|geometry| {
            let geometry: geo::Geometry<f64> = geometry.try_into().ok()?;
            geometry.bounding_rect()
        })
        .reduce(|a, b| {
            Rect::new(
                Coord {
                    x: a.min().x.min(b.min().x),
                    y: a.min().y.min(b.min().y),
                },
                Coord {
                    x: a.max().x.max(b.max().x),
                    y: a.max().y.max(b.max().y),
                },
            )
        })
        .ok_or(LoadError::EmptyBoundary)
}

fn convert_feature(feature: geojson::Feature) -> Feature {
    let geometry = feature
        .geometry
        .map_or(Geometry::Other, |g| convert_geometry(&g.value));

    let properties = feature.properties.map_or_else(FeatureProperties::default, |props| {
        serde_json::from_value(serde_json::Value::Object(props)).unwrap_or_else(|e| {
            log::debug!("Unreadable feature properties, using defaults: {e}");
            FeatureProperties::default()
        })
    });

    Feature::new(geometry, properties)
}

fn convert_geometry(value: &Value) -> Geometry {
    match value {
        Value::Point(position) => position_to_coord(position).map_or(Geometry::Other, Geometry::Point),
        Value::LineString(positions) => Geometry::LineString(positions_to_coords(positions)),
        Value::MultiLineString(lines) => Geometry::MultiLineString(
            lines.iter().map(|line| positions_to_coords(line)).collect(),
        ),
        _ => Geometry::Other,
    }
}

fn positions_to_coords(positions: &[Vec<f64>]) -> Vec<Coord<f64>> {
    positions
        .iter()
        .filter_map(|p| position_to_coord(p))
        .collect()
}

fn position_to_coord(position: &[f64]) -> Option<Coord<f64>> {
    match position {
        [x, y, ..] => Some(Coord { x: *x, y: *y }),
        _ => None,
    }
}

const fn type_name(geojson: &GeoJson) -> &'static str {
    match geojson {
        GeoJson::Geometry(_) => "Geometry",
        GeoJson::Feature(_) => "Feature",
        GeoJson::FeatureCollection(_) => "FeatureCollection",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use traffic_map_time_models::Hour;

    const TRAFFIC: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[-111.89, 40.76], [-111.88, 40.761], [-111.87, 40.762]]
                },
                "properties": {
                    "LOCATION": "400 S Main St",
                    "ROUTE_NAME": "0186",
                    "hourly_counts": [1, 2, 3, 4, 5, 6, 7, 8, 900]
                }
            },
            {
                "type": "Feature",
                "geometry": null,
                "properties": null
            },
            {
                "type": "Feature",
                "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]] },
                "properties": { "hourly_counts": [10] }
            }
        ]
    }"#;

    #[test]
    fn keeps_every_feature_in_order() {
        let collection = parse_collection(DatasetKind::Traffic, TRAFFIC).unwrap();
        assert_eq!(collection.kind(), DatasetKind::Traffic);
        assert_eq!(collection.len(), 3);

        let first = &collection.features()[0];
        assert_eq!(first.properties.location.as_deref(), Some("400 S Main St"));
        assert_eq!(first.volume_at(Hour::new(8).unwrap()), 900);
        assert_eq!(
            first.geometry.representative_coordinate(),
            Some(Coord { x: -111.88, y: 40.761 })
        );

        assert_eq!(collection.features()[1].geometry, Geometry::Other);
        assert_eq!(collection.features()[1].properties, FeatureProperties::default());
        assert_eq!(collection.features()[2].geometry, Geometry::Other);
    }

    #[test]
    fn points_parse_as_points() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [-111.9, 40.75, 1300.0] },
                "properties": { "NAME": "Ballpark", "MODE": "TRAX", "LINE": "Red Line" }
            }]
        }"#;
        let collection = parse_collection(DatasetKind::Transit, text).unwrap();
        assert_eq!(
            collection.features()[0].geometry,
            Geometry::Point(Coord { x: -111.9, y: 40.75 })
        );
    }

    #[test]
    fn malformed_counts_do_not_discard_stop_properties() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [-111.9, 40.75] },
                "properties": {
                    "NAME": "Central Station",
                    "MODE": "TRAX",
                    "LINE": "Red Line",
                    "hourly_counts": "n/a"
                }
            }]
        }"#;
        let collection = parse_collection(DatasetKind::Transit, text).unwrap();
        let props = &collection.features()[0].properties;

        assert_eq!(props.name.as_deref(), Some("Central Station"));
        assert_eq!(props.mode.as_deref(), Some("TRAX"));
        assert_eq!(props.line.as_deref(), Some("Red Line"));
        assert_eq!(collection.features()[0].volume_at(Hour::new(8).unwrap()), 0);
    }

    #[test]
    fn rejects_non_collections() {
        let text = r#"{ "type": "Point", "coordinates": [0.0, 0.0] }"#;
        assert!(matches!(
            parse_collection(DatasetKind::Transit, text),
            Err(LoadError::NotAFeatureCollection { found: "Geometry" })
        ));
        assert!(matches!(
            parse_collection(DatasetKind::Transit, "not json"),
            Err(LoadError::GeoJson(_))
        ));
    }

    #[test]
    fn boundary_bounds_span_all_features() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[-112.1, 40.7], [-111.8, 40.7], [-111.8, 40.85], [-112.1, 40.7]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": { "type": "Point", "coordinates": [-111.7, 40.6] }
                }
            ]
        }"#;
        let rect = parse_boundary(text).unwrap();
        assert!((rect.min().x - -112.1).abs() < f64::EPSILON);
        assert!((rect.min().y - 40.6).abs() < f64::EPSILON);
        assert!((rect.max().x - -111.7).abs() < f64::EPSILON);
        assert!((rect.max().y - 40.85).abs() < f64::EPSILON);
    }

    #[test]
    fn boundary_without_geometry_is_an_error() {
        let text = r#"{ "type": "FeatureCollection", "features": [] }"#;
        assert!(matches!(parse_boundary(text), Err(LoadError::EmptyBoundary)));
    }
}
