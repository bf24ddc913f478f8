#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Hour-of-day and time-of-day bucket types.
//!
//! Every dataset in the traffic map carries 24 hourly counts, indexed by
//! [`Hour`]. The comparison dashboard groups those hours into labeled
//! [`TimeBucket`]s (Morning, Midday, Evening). Hours that fall outside
//! every bucket never contribute to bucket sums.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Number of hours in a day, and the expected length of `hourly_counts`.
pub const HOURS_PER_DAY: u8 = 24;

/// Hour shown when a session starts.
pub const DEFAULT_HOUR: Hour = Hour(8);

/// An hour of the day, `0..=23`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Hour(u8);

impl Hour {
    /// Midnight.
    pub const MIDNIGHT: Self = Self(0);

    /// Creates an hour from a numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is greater than 23.
    pub const fn new(value: u8) -> Result<Self, InvalidHourError> {
        if value < HOURS_PER_DAY {
            Ok(Self(value))
        } else {
            Err(InvalidHourError { value })
        }
    }

    /// Returns the numeric value of this hour.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns this hour as an index into an hourly count array.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The following hour, wrapping 23 back around to 0.
    #[must_use]
    pub const fn wrapping_next(self) -> Self {
        Self((self.0 + 1) % HOURS_PER_DAY)
    }

    /// Slider label for this hour, e.g. `"08:00"`.
    #[must_use]
    pub fn label(self) -> String {
        format!("{:02}:00", self.0)
    }

    /// All 24 hours in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..HOURS_PER_DAY).map(Self)
    }
}

impl TryFrom<u8> for Hour {
    type Error = InvalidHourError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Hour> for u8 {
    fn from(hour: Hour) -> Self {
        hour.0
    }
}

impl std::fmt::Display for Hour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

/// Error returned when attempting to create an [`Hour`] from a value
/// outside `0..=23`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidHourError {
    /// The invalid hour value that was provided.
    pub value: u8,
}

impl std::fmt::Display for InvalidHourError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid hour {}: expected 0-23", self.value)
    }
}

impl std::error::Error for InvalidHourError {}

/// The named time-of-day periods shown in the comparison dashboard.
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
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum TimeOfDay {
    /// 06:00 through 10:59
    Morning,
    /// 11:00 through 15:59
    Midday,
    /// 16:00 through 20:59
    Evening,
}

impl TimeOfDay {
    /// Returns the hours covered by this period.
    #[must_use]
    pub const fn hours(self) -> std::ops::RangeInclusive<u8> {
        match self {
            Self::Morning => 6..=10,
            Self::Midday => 11..=15,
            Self::Evening => 16..=20,
        }
    }

    /// Returns all variants of this enum, in dashboard order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Morning, Self::Midday, Self::Evening]
    }
}

/// A labeled set of hours used to group hourly counts.
///
/// Buckets may overlap or leave gaps; aggregation sums each bucket
/// independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucket {
    /// Label shown on the chart axis.
    pub label: String,
    /// Hours included in this bucket.
    pub hours: Vec<Hour>,
}

impl TimeBucket {
    /// Creates a bucket from a label and a set of hours.
    #[must_use]
    pub fn new(label: impl Into<String>, hours: impl IntoIterator<Item = Hour>) -> Self {
        Self {
            label: label.into(),
            hours: hours.into_iter().collect(),
        }
    }

    /// Returns whether `hour` belongs to this bucket.
    #[must_use]
    pub fn contains(&self, hour: Hour) -> bool {
        self.hours.contains(&hour)
    }

    /// Morning, Midday and Evening, in that order.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        TimeOfDay::all()
            .iter()
            .map(|period| Self::from(*period))
            .collect()
    }
}

impl From<TimeOfDay> for TimeBucket {
    fn from(period: TimeOfDay) -> Self {
        Self::new(period.as_ref(), period.hours().map(Hour))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_range_is_checked() {
        assert_eq!(Hour::new(0).unwrap().value(), 0);
        assert_eq!(Hour::new(23).unwrap().value(), 23);
        assert_eq!(Hour::new(24), Err(InvalidHourError { value: 24 }));
    }

    #[test]
    fn next_hour_wraps_at_midnight() {
        assert_eq!(Hour::new(22).unwrap().wrapping_next().value(), 23);
        assert_eq!(Hour::new(23).unwrap().wrapping_next(), Hour::MIDNIGHT);
    }

    #[test]
    fn labels_are_zero_padded() {
        assert_eq!(DEFAULT_HOUR.label(), "08:00");
        assert_eq!(Hour::new(17).unwrap().label(), "17:00");
        assert_eq!(Hour::MIDNIGHT.to_string(), "00:00");
    }

    #[test]
    fn default_buckets_cover_six_through_twenty() {
        let buckets = TimeBucket::defaults();
        let labels: Vec<_> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Morning", "Midday", "Evening"]);

        for hour in Hour::all() {
            let covered = buckets.iter().filter(|b| b.contains(hour)).count();
            let expected = usize::from((6..=20).contains(&hour.value()));
            assert_eq!(covered, expected, "hour {hour} covered {covered} times");
        }
        assert!(buckets.iter().all(|b| b.hours.len() == 5));
    }

    #[test]
    fn time_of_day_parses_case_insensitively() {
        assert_eq!("evening".parse::<TimeOfDay>().unwrap(), TimeOfDay::Evening);
        assert!("night".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn hour_deserialization_rejects_out_of_range() {
        let ok: Hour = serde_json::from_str("5").unwrap();
        assert_eq!(ok.value(), 5);
        assert!(serde_json::from_str::<Hour>("30").is_err());
    }
}
