//! Single-address liveness probing.
//!
//! A probe is one minimal reachability check: one echo request, one
//! short wait. Network-level failure is not an error; unreachable
//! hosts, timeouts and permission problems all normalize to a dead
//! result so one bad address can never abort a sweep.

use std::net::IpAddr;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Result of one liveness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    pub addr: IpAddr,
    pub alive: bool,
    /// How long the check itself took, timeout included.
    pub rtt: Duration,
}

/// A single bounded-time reachability check against one address.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, addr: IpAddr, timeout: Duration) -> ProbeResult;
}

/// Probes by running the system `ping` utility with a single echo
/// request. Works unprivileged on every platform that ships `ping`,
/// at the cost of one short-lived subprocess per probe.
pub struct PingProber;

#[async_trait]
impl Prober for PingProber {
    async fn probe(&self, addr: IpAddr, timeout: Duration) -> ProbeResult {
        let started = Instant::now();

        let alive = match tokio::time::timeout(timeout, run_ping(addr, timeout)).await {
            Ok(alive) => alive,
            Err(_) => {
                debug!("probe of {addr} exceeded {}ms", timeout.as_millis());
                false
            }
        };

        ProbeResult {
            addr,
            alive,
            rtt: started.elapsed(),
        }
    }
}

async fn run_ping(addr: IpAddr, timeout: Duration) -> bool {
    let status = Command::new("ping")
        .args(ping_args(addr, timeout))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    match status {
        Ok(status) => status.success(),
        Err(err) => {
            debug!("failed to spawn ping for {addr}: {err}");
            false
        }
    }
}

// `-W`/`-w` is only the utility's own wait; the tokio timeout above is
// the binding bound, mirrored after the original double layer of
// ping-wait plus subprocess deadline.

#[cfg(unix)]
fn ping_args(addr: IpAddr, timeout: Duration) -> Vec<String> {
    // iputils takes whole seconds here
    let wait_secs = timeout.as_secs().max(1);
    vec![
        "-c".into(),
        "1".into(),
        "-W".into(),
        wait_secs.to_string(),
        addr.to_string(),
    ]
}

#[cfg(windows)]
fn ping_args(addr: IpAddr, timeout: Duration) -> Vec<String> {
    vec![
        "-n".into(),
        "1".into(),
        "-w".into(),
        timeout.as_millis().to_string(),
        addr.to_string(),
    ]
}
