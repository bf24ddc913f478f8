//! A map session running as a tokio task.
//!
//! User commands, playback ticks, and finished loads all arrive on one
//! mpsc queue and are applied to the [`ViewController`] one at a time,
//! so a tick can never interleave with a mode switch or a slider move.

use std::time::Duration;

use geo::Rect;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use traffic_map_feature::{load_boundary, load_collection};
use traffic_map_feature_models::{DatasetKind, FeatureCollection};
use traffic_map_time_models::Hour;

use crate::ViewError;
use crate::config::ViewConfig;
use crate::controller::ViewController;
use crate::playback::PlaybackController;
use crate::state::{Mode, ViewState};

const COMMAND_BUFFER: usize = 64;

/// Everything a session reacts to.
#[derive(Debug)]
pub enum Command {
    /// Slider moved.
    SetHour(Hour),
    /// Mode toggle changed.
    SwitchMode(Mode),
    /// Start playback.
    Play,
    /// Stop playback.
    Pause,
    /// Play/pause button.
    TogglePlayback,
    /// Playback timer fired.
    Tick {
        /// Timer generation; ticks from a stopped timer are ignored.
        generation: u64,
    },
    /// A dataset finished loading.
    DataLoaded(FeatureCollection),
    /// A dataset failed to load.
    LoadFailed {
        /// Which dataset.
        kind: DatasetKind,
        /// Error description.
        message: String,
    },
    /// The city boundary finished loading.
    BoundaryLoaded(Rect<f64>),
    /// Neighborhood dropdown changed.
    SelectNeighborhood(String),
    /// A comparison bar was clicked.
    HighlightBucket {
        /// Dataset of the clicked bar.
        kind: DatasetKind,
        /// Index of the clicked bucket.
        bucket_index: usize,
    },
    /// Restore default opacities.
    ResetHighlights,
    /// Reply with the current state.
    Snapshot(oneshot::Sender<ViewState>),
    /// Stop the session.
    Shutdown,
}

/// Cloneable sender half of a session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Command>,
}

impl SessionHandle {
    /// Queues a command.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::SessionClosed`] if the session has stopped.
    pub async fn send(&self, command: Command) -> Result<(), ViewError> {
        self.tx
            .send(command)
            .await
            .map_err(|_| ViewError::SessionClosed)
    }

    /// Selects an hour.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::SessionClosed`] if the session has stopped.
    pub async fn set_hour(&self, hour: Hour) -> Result<(), ViewError> {
        self.send(Command::SetHour(hour)).await
    }

    /// Switches the displayed dataset.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::SessionClosed`] if the session has stopped.
    pub async fn switch_mode(&self, mode: Mode) -> Result<(), ViewError> {
        self.send(Command::SwitchMode(mode)).await
    }

    /// Starts playback.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::SessionClosed`] if the session has stopped.
    pub async fn play(&self) -> Result<(), ViewError> {
        self.send(Command::Play).await
    }

    /// Stops playback.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::SessionClosed`] if the session has stopped.
    pub async fn pause(&self) -> Result<(), ViewError> {
        self.send(Command::Pause).await
    }

    /// Starts playback if stopped, stops it if running.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::SessionClosed`] if the session has stopped.
    pub async fn toggle_playback(&self) -> Result<(), ViewError> {
        self.send(Command::TogglePlayback).await
    }

    /// Hands a loaded dataset to the session.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::SessionClosed`] if the session has stopped.
    pub async fn data_loaded(&self, collection: FeatureCollection) -> Result<(), ViewError> {
        self.send(Command::DataLoaded(collection)).await
    }

    /// Reports a failed load.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::SessionClosed`] if the session has stopped.
    pub async fn load_failed(
        &self,
        kind: DatasetKind,
        message: impl Into<String>,
    ) -> Result<(), ViewError> {
        self.send(Command::LoadFailed {
            kind,
            message: message.into(),
        })
        .await
    }

    /// Changes the compared neighborhood.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::SessionClosed`] if the session has stopped.
    pub async fn select_neighborhood(&self, name: impl Into<String>) -> Result<(), ViewError> {
        self.send(Command::SelectNeighborhood(name.into())).await
    }

    /// Highlights the selected neighborhood for a clicked bar.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::SessionClosed`] if the session has stopped.
    pub async fn highlight_bucket(
        &self,
        kind: DatasetKind,
        bucket_index: usize,
    ) -> Result<(), ViewError> {
        self.send(Command::HighlightBucket { kind, bucket_index })
            .await
    }

    /// Restores default opacities.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::SessionClosed`] if the session has stopped.
    pub async fn reset_highlights(&self) -> Result<(), ViewError> {
        self.send(Command::ResetHighlights).await
    }

    /// Current state, after every command queued before this call.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::SessionClosed`] if the session has stopped.
    pub async fn state(&self) -> Result<ViewState, ViewError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot(reply)).await?;
        rx.await.map_err(|_| ViewError::SessionClosed)
    }

    /// Stops the session.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::SessionClosed`] if the session already stopped.
    pub async fn shutdown(&self) -> Result<(), ViewError> {
        self.send(Command::Shutdown).await
    }
}

struct Session {
    controller: ViewController,
    playback: PlaybackController,
    rx: mpsc::Receiver<Command>,
}

impl Session {
    async fn run(mut self) -> ViewController {
        while let Some(command) = self.rx.recv().await {
            if !self.handle(command) {
                break;
            }
        }
        self.pause();
        log::debug!("Session stopped at {}", self.controller.state().current_hour);
        self.controller
    }

    fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::SetHour(hour) => self.controller.set_hour(hour),
            Command::SwitchMode(mode) => self.controller.switch_mode(mode),
            Command::Play => self.play(),
            Command::Pause => self.pause(),
            Command::TogglePlayback => {
                if self.playback.is_playing() {
                    self.pause();
                } else {
                    self.play();
                }
            }
            Command::Tick { generation } => {
                if self.playback.accepts(generation) {
                    self.controller.advance_hour();
                } else {
                    log::trace!("Dropping stale tick from timer {generation}");
                }
            }
            Command::DataLoaded(collection) => self.controller.data_loaded(collection),
            Command::LoadFailed { kind, message } => self.controller.load_failed(kind, &message),
            Command::BoundaryLoaded(bounds) => self.controller.boundary_loaded(bounds),
            Command::SelectNeighborhood(name) => self.controller.select_neighborhood(&name),
            Command::HighlightBucket { kind, bucket_index } => {
                self.controller.highlight_bucket(kind, bucket_index);
            }
            Command::ResetHighlights => self.controller.reset_highlights(),
            Command::Snapshot(reply) => {
                let _ = reply.send(self.controller.state());
            }
            Command::Shutdown => return false,
        }
        true
    }

    fn play(&mut self) {
        if self.playback.play() {
            self.controller.set_playing(true);
            log::info!("Playback started at {}", self.controller.state().current_hour);
        }
    }

    fn pause(&mut self) {
        if self.playback.pause() {
            self.controller.set_playing(false);
            log::info!("Playback paused at {}", self.controller.state().current_hour);
        }
    }
}

/// Starts a session task around `controller`.
///
/// The task ends on [`Command::Shutdown`] or once every handle is
/// dropped, and yields the controller back.
#[must_use]
pub fn spawn_session(
    controller: ViewController,
    tick_interval: Duration,
) -> (SessionHandle, JoinHandle<ViewController>) {
    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
    let session = Session {
        controller,
        playback: PlaybackController::new(tick_interval, tx.downgrade()),
        rx,
    };
    let task = tokio::spawn(session.run());
    (SessionHandle { tx }, task)
}

/// Starts loading both datasets and the boundary in the background.
///
/// Each finished load is posted to the session; a failure is posted as
/// [`Command::LoadFailed`] and does not affect the other dataset. A
/// missing boundary is only logged.
#[must_use]
pub fn spawn_loaders(
    client: &reqwest::Client,
    config: &ViewConfig,
    handle: &SessionHandle,
) -> Vec<JoinHandle<()>> {
    let mut tasks: Vec<JoinHandle<()>> = DatasetKind::all()
        .iter()
        .map(|&kind| {
            let client = client.clone();
            let source = config.data.source(kind).clone();
            let handle = handle.clone();
            tokio::spawn(async move {
                let posted = match load_collection(&client, &source, kind).await {
                    Ok(collection) => handle.data_loaded(collection).await,
                    Err(e) => handle.load_failed(kind, e.to_string()).await,
                };
                if posted.is_err() {
                    log::debug!("Session closed before {kind} data was delivered");
                }
            })
        })
        .collect();

    if let Some(source) = config.data.boundary.clone() {
        let client = client.clone();
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            match load_boundary(&client, &source).await {
                Ok(bounds) => {
                    let _ = handle.send(Command::BoundaryLoaded(bounds)).await;
                }
                Err(e) => log::warn!("Boundary unavailable, map will not be fitted: {e}"),
            }
        }));
    }

    tasks
}
