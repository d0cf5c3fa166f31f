use std::net::IpAddr;
use std::time::Duration;

/// Final aggregate of one sweep, produced exactly once whether the
/// sweep ran to completion or was cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Addresses that answered, in completion order.
    pub live: Vec<IpAddr>,
    /// Wall-clock time from first dispatch to the completion event.
    pub elapsed: Duration,
    /// Host addresses the range expanded to.
    pub total: usize,
    /// Probes folded in before the sweep drained; less than `total`
    /// only when the sweep was cancelled.
    pub completed: usize,
}

/// Observer for a running sweep.
///
/// The engine calls these from its single fold task, so an
/// implementation sees events one at a time: a `(progress, result)`
/// pair per completed probe, in completion order, then exactly one
/// `on_complete`, always last.
pub trait SweepSink: Send + Sync {
    fn on_progress(&self, processed: usize, total: usize);

    fn on_result(&self, addr: IpAddr, alive: bool);

    fn on_complete(&self, outcome: &SweepOutcome);
}

/// Sink for batch callers that only want the final [`SweepOutcome`].
pub struct NoopSink;

impl SweepSink for NoopSink {
    fn on_progress(&self, _processed: usize, _total: usize) {}

    fn on_result(&self, _addr: IpAddr, _alive: bool) {}

    fn on_complete(&self, _outcome: &SweepOutcome) {}
}
