//! Session configuration.
//!
//! Every key is optional; anything missing falls back to the defaults
//! below. The file location comes from the caller or the
//! `TRAFFIC_MAP_CONFIG` environment variable, and `TRAFFIC_MAP_TICK_MS`
//! overrides the playback interval.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use traffic_map_feature::DataSource;
use traffic_map_feature_models::DatasetKind;
use traffic_map_neighborhood::NeighborhoodSet;
use traffic_map_neighborhood::registry::{DEFAULT_SET_ID, find_set};
use traffic_map_time_models::{DEFAULT_HOUR, Hour};

use crate::ViewError;
use crate::state::{Mode, ViewState};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "TRAFFIC_MAP_CONFIG";
/// Environment variable overriding [`ViewConfig::tick_interval_ms`].
pub const TICK_ENV: &str = "TRAFFIC_MAP_TICK_MS";
/// Milliseconds between playback ticks.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 800;

const DEFAULT_TRAFFIC_PATH: &str = "data/traffic_hourly_slc_sample.geojson";
const DEFAULT_TRANSIT_PATH: &str = "data/transit_combined_hourly.geojson";
const DEFAULT_BOUNDARY_PATH: &str = "data/Salt_Lake_City_Boundary.geojson";

/// Where each dataset is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Traffic segments.
    pub traffic: DataSource,
    /// Transit stops.
    pub transit: DataSource,
    /// City boundary the map is fitted to. Optional.
    pub boundary: Option<DataSource>,
}

impl DataConfig {
    /// Source of the given dataset.
    #[must_use]
    pub const fn source(&self, kind: DatasetKind) -> &DataSource {
        match kind {
            DatasetKind::Traffic => &self.traffic,
            DatasetKind::Transit => &self.transit,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            traffic: DataSource::from(DEFAULT_TRAFFIC_PATH),
            transit: DataSource::from(DEFAULT_TRANSIT_PATH),
            boundary: Some(DataSource::from(DEFAULT_BOUNDARY_PATH)),
        }
    }
}

/// Top-level session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Milliseconds between playback ticks.
    pub tick_interval_ms: u64,
    /// Hour shown on startup.
    pub initial_hour: Hour,
    /// Dataset shown on startup.
    pub initial_mode: Mode,
    /// Registered neighborhood set to compare, when no file is given.
    pub neighborhood_set: String,
    /// TOML file with a custom neighborhood set.
    pub neighborhoods: Option<PathBuf>,
    /// Dataset locations.
    pub data: DataConfig,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            initial_hour: DEFAULT_HOUR,
            initial_mode: Mode::Traffic,
            neighborhood_set: DEFAULT_SET_ID.to_string(),
            neighborhoods: None,
            data: DataConfig::default(),
        }
    }
}

impl ViewConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Config`] if the text is not valid for the
    /// config schema.
    pub fn from_toml_str(text: &str) -> Result<Self, ViewError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ViewError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reads the config from `path`, or from [`CONFIG_ENV`] when no path
    /// is given, or falls back to defaults. [`TICK_ENV`] is applied last.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] if a named config file cannot be read or
    /// parsed.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ViewError> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let config = match path.or(from_env.as_deref()) {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(config.with_tick_override(std::env::var(TICK_ENV).ok().as_deref()))
    }

    /// Replaces the tick interval with `value` when it parses as
    /// milliseconds. Unparseable values are logged and ignored.
    #[must_use]
    pub fn with_tick_override(mut self, value: Option<&str>) -> Self {
        if let Some(value) = value {
            match value.trim().parse() {
                Ok(ms) => self.tick_interval_ms = ms,
                Err(e) => log::warn!("Ignoring {TICK_ENV}={value}: {e}"),
            }
        }
        self
    }

    /// Playback interval as a [`Duration`].
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// State the session starts in.
    #[must_use]
    pub const fn initial_state(&self) -> ViewState {
        ViewState::new(self.initial_mode, self.initial_hour)
    }

    /// The neighborhood set to compare: the configured file if any,
    /// otherwise the registered set named by `neighborhood_set`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] if the file cannot be loaded or the set id is
    /// not registered.
    pub fn neighborhood_set(&self) -> Result<NeighborhoodSet, ViewError> {
        if let Some(path) = &self.neighborhoods {
            return Ok(NeighborhoodSet::load(path)?);
        }
        find_set(&self.neighborhood_set).ok_or_else(|| ViewError::UnknownNeighborhoodSet {
            id: self.neighborhood_set.clone(),
        })
    }
}
