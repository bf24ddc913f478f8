#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Color resolution and per-hour visual encodings for map features.
//!
//! Everything in this crate is a pure function of its inputs: the same
//! feature and hour always produce the same encoding. Renderers receive
//! the computed values and never look at raw hourly counts themselves.

pub mod color;
pub mod encoder;
pub mod highlight;

pub use color::{Color, VolumeSeverity, resolve_transit_color, resolve_volume_color};
pub use encoder::{
    Encoding, TrafficEncoding, TransitEncoding, encode_collection, encode_feature,
    encode_traffic_feature, encode_transit_feature,
};
pub use highlight::{FeatureOpacity, HighlightPass, highlight_neighborhood, reset_highlights};
