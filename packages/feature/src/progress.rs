//! Progress reporting for dataset preparation.
//!
//! Preparation code reports through [`ProgressCallback`] and never knows
//! how progress is shown. The CLI plugs in an `indicatif` bar; tests and
//! library callers pass [`NullProgress`].

/// Receives progress updates. Implementations are shared across threads.
pub trait ProgressCallback: Send + Sync {
    /// Sets the expected number of units, once known.
    fn set_total(&self, total: u64);

    /// Advances by `delta` units.
    fn inc(&self, delta: u64);

    /// Replaces the status message.
    fn set_message(&self, msg: String);

    /// Marks the work complete.
    fn finish(&self, msg: String);
}

/// Discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}
