//! Reads datasets from disk or over HTTP.
//!
//! Loading never blocks the caller's event loop: both entry points are
//! `async` and are expected to be spawned, with the result posted back to
//! the session once available.

use geo::Rect;
use traffic_map_feature_models::{DatasetKind, FeatureCollection};

use crate::{DataSource, LoadError, parse};

/// Fetches and parses a feature collection.
///
/// # Errors
///
/// Returns [`LoadError`] if the source cannot be read or is not a
/// `GeoJSON` `FeatureCollection`.
pub async fn load_collection(
    client: &reqwest::Client,
    source: &DataSource,
    kind: DatasetKind,
) -> Result<FeatureCollection, LoadError> {
    log::info!("Loading {kind} data from {}", source.describe());
    let text = read_source(client, source).await?;
    let collection = parse::parse_collection(kind, &text)?;
    log::info!("Loaded {} {kind} features", collection.len());
    Ok(collection)
}

/// Fetches a city boundary and returns its bounding box.
///
/// # Errors
///
/// Returns [`LoadError`] if the source cannot be read or contains no
/// geometry.
pub async fn load_boundary(
    client: &reqwest::Client,
    source: &DataSource,
) -> Result<Rect<f64>, LoadError> {
    log::info!("Loading boundary from {}", source.describe());
    let text = read_source(client, source).await?;
    parse::parse_boundary(&text)
}

async fn read_source(client: &reqwest::Client, source: &DataSource) -> Result<String, LoadError> {
    match source {
        DataSource::Path(path) => Ok(tokio::fs::read_to_string(path).await?),
        DataSource::Url(url) => {
            let resp = client.get(url).send().await?.error_for_status()?;
            Ok(resp.text().await?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loads_collection_from_file() {
        let path = std::env::temp_dir().join(format!(
            "traffic_map_load_test_{}.geojson",
            std::process::id()
        ));
        tokio::fs::write(
            &path,
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","geometry":{"type":"Point","coordinates":[-111.89,40.76]},
                 "properties":{"hourly_counts":[1,2,3]}}
            ]}"#,
        )
        .await
        .unwrap();

        let client = reqwest::Client::new();
        let collection = load_collection(&client, &DataSource::Path(path.clone()), DatasetKind::Transit)
            .await
            .unwrap();
        assert_eq!(collection.len(), 1);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let client = reqwest::Client::new();
        let source = DataSource::from("/nonexistent/traffic_map/traffic.geojson");
        let result = load_collection(&client, &source, DatasetKind::Traffic).await;
        assert!(matches!(result, Err(LoadError::Io(_))));
    }
}
