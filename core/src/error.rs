use thiserror::Error;

use crate::sweep::{MAX_WORKERS, MIN_WORKERS};

/// Structural failures surfaced by [`crate::sweep::SweepEngine::start`]
/// and [`crate::sweep::SweepHandle::wait`].
///
/// Probe-level failures (timeout, unreachable, transient I/O) never
/// appear here; they normalize to a dead result inside the prober.
/// Cancellation is not an error either: a cancelled sweep yields a
/// valid partial [`crate::event::SweepOutcome`].
#[derive(Debug, Error)]
pub enum SweepError {
    /// Worker count outside the accepted pool bounds.
    #[error("worker count {got} outside accepted range {MIN_WORKERS}..={MAX_WORKERS}")]
    InvalidConcurrency { got: usize },

    /// A sweep is already in flight on this engine instance.
    #[error("a sweep is already running on this engine")]
    AlreadyRunning,

    /// The fold task died before producing an outcome.
    #[error("sweep task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
