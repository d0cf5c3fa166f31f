//! # Sweep Engine
//!
//! Expands a [`HostRange`] into its host addresses and drives a
//! bounded pool of probe workers across them.
//!
//! Workers pull unassigned addresses from a shared cursor, so no
//! address is ever claimed twice and an idle worker picks up the next
//! one immediately. Every result flows through a single fold task,
//! the only place sweep state is mutated, which also emits sink
//! events in completion order. Cancellation is cooperative: workers
//! check the flag before each claim, and probes already in flight run
//! to their bound and still count.

use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use sweepr_common::config::SweepConfig;
use sweepr_common::network::range::HostRange;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::SweepError;
use crate::event::{SweepOutcome, SweepSink};
use crate::probe::{ProbeResult, Prober};

/// Smallest accepted worker pool.
pub const MIN_WORKERS: usize = 1;
/// Largest accepted worker pool.
pub const MAX_WORKERS: usize = 200;

/// Slack on top of the per-probe timeout before a worker gives up on
/// its prober and records the address as dead.
const PROBE_GRACE: Duration = Duration::from_millis(500);

/// Drives at most one sweep at a time; reusable once a sweep drains.
pub struct SweepEngine {
    prober: Arc<dyn Prober>,
    busy: Arc<AtomicBool>,
}

impl SweepEngine {
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self {
            prober,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Starts sweeping `range` and returns immediately.
    ///
    /// Fails before any dispatch when the worker count is outside
    /// [`MIN_WORKERS`]..=[`MAX_WORKERS`] or when a sweep is already in
    /// flight on this engine; a rejected start leaves the engine
    /// untouched.
    pub fn start(
        &self,
        range: &HostRange,
        config: SweepConfig,
        sink: Arc<dyn SweepSink>,
    ) -> Result<SweepHandle, SweepError> {
        if !(MIN_WORKERS..=MAX_WORKERS).contains(&config.workers) {
            return Err(SweepError::InvalidConcurrency {
                got: config.workers,
            });
        }

        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SweepError::AlreadyRunning);
        }

        let addrs: Arc<Vec<IpAddr>> = Arc::new(range.hosts().map(IpAddr::V4).collect());
        let total = addrs.len();
        let cancelled = Arc::new(AtomicBool::new(false));
        let cursor = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::unbounded_channel::<ProbeResult>();

        debug!("dispatching {total} hosts to {} workers", config.workers);
        let started = Instant::now();

        for _ in 0..config.workers {
            let worker = Worker {
                addrs: Arc::clone(&addrs),
                cursor: Arc::clone(&cursor),
                cancelled: Arc::clone(&cancelled),
                prober: Arc::clone(&self.prober),
                probe_timeout: config.probe_timeout,
                tx: tx.clone(),
            };
            tokio::spawn(worker.run());
        }
        drop(tx);

        let fold = tokio::spawn(fold_results(
            rx,
            total,
            started,
            sink,
            Arc::clone(&self.busy),
        ));

        Ok(SweepHandle { cancelled, fold })
    }
}

/// Control surface for one running sweep.
#[derive(Debug)]
pub struct SweepHandle {
    cancelled: Arc<AtomicBool>,
    fold: JoinHandle<SweepOutcome>,
}

impl SweepHandle {
    /// Stops dispatch of further addresses. Idempotent; probes already
    /// in flight run to their bound and their results still count.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// A cloneable cancel switch, e.g. for a signal handler task.
    pub fn canceller(&self) -> SweepCanceller {
        SweepCanceller {
            flag: Arc::clone(&self.cancelled),
        }
    }

    /// Resolves once every dispatched probe has drained, for normal
    /// and cancelled sweeps alike.
    pub async fn wait(self) -> Result<SweepOutcome, SweepError> {
        Ok(self.fold.await?)
    }
}

/// Cancel switch detached from the handle's lifetime.
#[derive(Clone)]
pub struct SweepCanceller {
    flag: Arc<AtomicBool>,
}

impl SweepCanceller {
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

struct Worker {
    addrs: Arc<Vec<IpAddr>>,
    cursor: Arc<AtomicUsize>,
    cancelled: Arc<AtomicBool>,
    prober: Arc<dyn Prober>,
    probe_timeout: Duration,
    tx: mpsc::UnboundedSender<ProbeResult>,
}

impl Worker {
    async fn run(self) {
        loop {
            if self.cancelled.load(Ordering::Relaxed) {
                break;
            }

            let idx = self.cursor.fetch_add(1, Ordering::Relaxed);
            let Some(addr) = self.addrs.get(idx).copied() else {
                break;
            };

            let result = self.bounded_probe(addr).await;
            if self.tx.send(result).is_err() {
                break;
            }
        }
    }

    /// A misbehaving prober must not stall the pool, so the probe
    /// future is cut off a grace period past its own bound.
    async fn bounded_probe(&self, addr: IpAddr) -> ProbeResult {
        let deadline = self.probe_timeout + PROBE_GRACE;

        match tokio::time::timeout(deadline, self.prober.probe(addr, self.probe_timeout)).await {
            Ok(result) => result,
            Err(_) => {
                debug!("prober stalled on {addr}, recording as dead");
                ProbeResult {
                    addr,
                    alive: false,
                    rtt: deadline,
                }
            }
        }
    }
}

/// The single serialization point: folds results in completion order,
/// feeds the sink, and emits the completion event once the channel
/// drains (all workers exited, normally or via cancellation).
async fn fold_results(
    mut rx: mpsc::UnboundedReceiver<ProbeResult>,
    total: usize,
    started: Instant,
    sink: Arc<dyn SweepSink>,
    busy: Arc<AtomicBool>,
) -> SweepOutcome {
    let mut live: Vec<IpAddr> = Vec::new();
    let mut processed = 0usize;

    while let Some(result) = rx.recv().await {
        processed += 1;
        if result.alive {
            live.push(result.addr);
        }

        sink.on_progress(processed, total);
        sink.on_result(result.addr, result.alive);
    }

    let outcome = SweepOutcome {
        live,
        elapsed: started.elapsed(),
        total,
        completed: processed,
    };

    sink.on_complete(&outcome);
    busy.store(false, Ordering::Release);

    outcome
}
