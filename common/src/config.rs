use std::time::Duration;

/// Default worker pool size for a sweep.
pub const DEFAULT_WORKERS: usize = 50;

/// Default wait for a single liveness probe, in milliseconds.
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 500;

/// Tunables for a single sweep run.
///
/// Passed explicitly into the engine; there are no hidden
/// module-level defaults beyond [`Default::default`].
#[derive(Debug, Clone, Copy)]
pub struct SweepConfig {
    /// Number of concurrent probe workers.
    pub workers: usize,
    /// Upper bound on a single liveness probe.
    pub probe_timeout: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            probe_timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
        }
    }
}
