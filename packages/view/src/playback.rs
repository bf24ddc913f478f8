//! Timer that advances the hour while playing.
//!
//! At most one interval task exists. Each start bumps a generation
//! number that is stamped on every tick; pausing aborts the task and
//! bumps it again, so a tick that was already queued when playback
//! stopped is recognized as stale and dropped by the session.

use std::time::Duration;

use tokio::sync::mpsc::WeakSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::session::Command;

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Owns the playback interval task.
#[derive(Debug)]
pub struct PlaybackController {
    period: Duration,
    commands: WeakSender<Command>,
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl PlaybackController {
    /// Creates a stopped controller that will post ticks to `commands`
    /// every `period`.
    ///
    /// The sender is held weakly so a running timer never keeps a session
    /// alive on its own.
    #[must_use]
    pub fn new(period: Duration, commands: WeakSender<Command>) -> Self {
        Self {
            period: period.max(MIN_PERIOD),
            commands,
            generation: 0,
            task: None,
        }
    }

    /// Whether the timer is running.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.task.is_some()
    }

    /// Generation stamped on ticks from the current timer.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a tick with `generation` came from the running timer.
    #[must_use]
    pub const fn accepts(&self, generation: u64) -> bool {
        self.is_playing() && generation == self.generation
    }

    /// Starts the timer. The first tick fires one period from now.
    /// Returns `false` without doing anything if already playing.
    pub fn play(&mut self) -> bool {
        if self.is_playing() {
            return false;
        }

        self.generation += 1;
        let generation = self.generation;
        let period = self.period;
        let commands = self.commands.clone();

        self.task = Some(tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(tx) = commands.upgrade() else {
                    break;
                };
                if tx.send(Command::Tick { generation }).await.is_err() {
                    break;
                }
            }
            log::trace!("Playback timer {generation} finished");
        }));
        true
    }

    /// Stops the timer. Returns `false` if it was not running.
    pub fn pause(&mut self) -> bool {
        let Some(task) = self.task.take() else {
            return false;
        };
        task.abort();
        self.generation += 1;
        true
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
