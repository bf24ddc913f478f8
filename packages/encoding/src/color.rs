//! Volume severity colors and transit line colors.

use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};

/// Volumes below this are [`VolumeSeverity::Low`].
pub const MEDIUM_VOLUME_THRESHOLD: u64 = 500;

/// Volumes at or above this are [`VolumeSeverity::High`].
pub const HIGH_VOLUME_THRESHOLD: u64 = 1000;

/// A CSS color as handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Color(&'static str);

impl Color {
    /// Wraps a CSS color string.
    #[must_use]
    pub const fn new(css: &'static str) -> Self {
        Self(css)
    }

    /// Returns the CSS color string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Three-tier traffic volume classification.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum VolumeSeverity {
    /// Fewer than 500 vehicles
    Low,
    /// 500 to 999 vehicles
    Medium,
    /// 1000 or more vehicles
    High,
}

impl VolumeSeverity {
    /// Classifies an hourly volume.
    #[must_use]
    pub const fn from_volume(volume: u64) -> Self {
        if volume < MEDIUM_VOLUME_THRESHOLD {
            Self::Low
        } else if volume < HIGH_VOLUME_THRESHOLD {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Stroke color for this severity.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Low => Color("yellow"),
            Self::Medium => Color("orange"),
            Self::High => Color("red"),
        }
    }
}

/// Maps an hourly traffic volume to its severity color.
#[must_use]
pub const fn resolve_volume_color(volume: u64) -> Color {
    VolumeSeverity::from_volume(volume).color()
}

/// Color for transit stops whose line and mode are both unknown.
pub const DEFAULT_TRANSIT_COLOR: Color = Color("#666");

/// Official line colors, matched exactly against `LINE`.
const LINE_COLORS: &[(&str, Color)] = &[
    ("Red Line", Color("#e52527")),
    ("Blue Line", Color("#2b60bf")),
    ("Green Line", Color("#536F18")),
    ("FrontRunner", Color("#00B379")),
    ("Bus 2", Color("#02bbec")),
    ("Bus 72", Color("#7d58a6")),
    ("Bus 603", Color("#f77200")),
];

/// Fallback colors, matched exactly against `MODE`.
const MODE_COLORS: &[(&str, Color)] = &[
    ("Commuter Rail", Color("#00B379")),
    ("TRAX", Color("#008ecf")),
    ("Bus", Color("#E8961F")),
    ("Light Rail", Color("#008ecf")),
];

/// Resolves the color of a transit stop.
///
/// The line table wins over the mode table; both lookups are exact and
/// case-sensitive. Anything unmatched gets [`DEFAULT_TRANSIT_COLOR`].
#[must_use]
pub fn resolve_transit_color(mode: &str, line: &str) -> Color {
    lookup(LINE_COLORS, line)
        .or_else(|| lookup(MODE_COLORS, mode))
        .unwrap_or(DEFAULT_TRANSIT_COLOR)
}

fn lookup(table: &[(&str, Color)], key: &str) -> Option<Color> {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, color)| *color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_color_boundaries_are_exact() {
        assert_eq!(resolve_volume_color(0), Color::new("yellow"));
        assert_eq!(resolve_volume_color(499), Color::new("yellow"));
        assert_eq!(resolve_volume_color(500), Color::new("orange"));
        assert_eq!(resolve_volume_color(999), Color::new("orange"));
        assert_eq!(resolve_volume_color(1000), Color::new("red"));
        assert_eq!(resolve_volume_color(u64::MAX), Color::new("red"));
    }

    #[test]
    fn severity_is_monotonic_in_volume() {
        let mut previous = VolumeSeverity::Low;
        for volume in (0..3000).step_by(7) {
            let severity = VolumeSeverity::from_volume(volume);
            assert!(severity >= previous, "severity dropped at volume {volume}");
            previous = severity;
        }
    }

    #[test]
    fn line_lookup_wins_over_mode() {
        assert_eq!(resolve_transit_color("Bus", "Red Line"), Color::new("#e52527"));
        assert_eq!(
            resolve_transit_color("Commuter Rail", "FrontRunner"),
            Color::new("#00B379")
        );
    }

    #[test]
    fn unknown_line_falls_back_to_mode() {
        assert_eq!(resolve_transit_color("TRAX", "Unknown Line"), Color::new("#008ecf"));
        assert_eq!(resolve_transit_color("Bus", "Bus 39"), Color::new("#E8961F"));
        assert_eq!(resolve_transit_color("Light Rail", ""), Color::new("#008ecf"));
    }

    #[test]
    fn unknown_mode_and_line_use_default() {
        assert_eq!(resolve_transit_color("Unknown", "Unknown"), DEFAULT_TRANSIT_COLOR);
        assert_eq!(resolve_transit_color("", ""), DEFAULT_TRANSIT_COLOR);
    }

    #[test]
    fn lookups_are_case_sensitive() {
        assert_eq!(resolve_transit_color("trax", "red line"), DEFAULT_TRANSIT_COLOR);
        assert_eq!(resolve_transit_color("BUS", " Bus 72"), DEFAULT_TRANSIT_COLOR);
    }
}
