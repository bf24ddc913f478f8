#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Interactive state of the traffic/transit map.
//!
//! The [`controller::ViewController`] is a synchronous state machine that
//! owns the current mode, hour, playback flag, and loaded datasets, and
//! pushes encodings to registered [`renderer::MapRenderer`]s. The
//! [`session`] module wraps it in a tokio task so playback ticks, data
//! arrival, and user commands are serialized through one queue.

pub mod compare;
pub mod config;
pub mod controller;
pub mod playback;
pub mod renderer;
pub mod session;
pub mod state;

#[cfg(test)]
mod test_support;

use thiserror::Error;
use traffic_map_neighborhood::NeighborhoodError;

pub use compare::{CompareView, Comparison};
pub use config::ViewConfig;
pub use controller::ViewController;
pub use playback::PlaybackController;
pub use renderer::{ChartRenderer, EncodedFeature, MapRenderer, RenderPass};
pub use session::{Command, SessionHandle, spawn_loaders, spawn_session};
pub use state::{Mode, ViewState};

/// Errors that can occur while configuring or driving a session.
#[derive(Debug, Error)]
pub enum ViewError {
    /// Reading a config file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for the config schema.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Loading the neighborhood set failed.
    #[error("Neighborhood error: {0}")]
    Neighborhood(#[from] NeighborhoodError),

    /// The configured neighborhood set id is not registered.
    #[error("Unknown neighborhood set '{id}'")]
    UnknownNeighborhoodSet {
        /// The requested set identifier.
        id: String,
    },

    /// The session task has stopped and no longer accepts commands.
    #[error("Session closed")]
    SessionClosed,
}
