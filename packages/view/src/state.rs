//! The small piece of state every renderer reflects.

use serde::Serialize;
use traffic_map_feature_models::DatasetKind;
use traffic_map_time_models::{DEFAULT_HOUR, Hour};

/// Which dataset is displayed. Exactly one layer is visible at a time.
pub type Mode = DatasetKind;

/// Current mode, hour, and playback flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// Displayed dataset.
    pub mode: Mode,
    /// Selected hour.
    pub current_hour: Hour,
    /// Whether the hour is advancing automatically.
    pub playing: bool,
}

impl ViewState {
    /// Builds a paused state.
    #[must_use]
    pub const fn new(mode: Mode, current_hour: Hour) -> Self {
        Self {
            mode,
            current_hour,
            playing: false,
        }
    }

    /// Whether the layer for `kind` should be shown.
    #[must_use]
    pub fn is_visible(&self, kind: DatasetKind) -> bool {
        self.mode == kind
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(Mode::Traffic, DEFAULT_HOUR)
    }
}
