use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use colored::*;
use tracing::{info, warn};

use sweepr_common::config::SweepConfig;
use sweepr_common::network::range::HostRange;
use sweepr_core::event::SweepOutcome;
use sweepr_core::probe::PingProber;
use sweepr_core::sweep::SweepEngine;

use crate::terminal::{colors, print, progress::ProgressSink};

pub async fn sweep(
    range: HostRange,
    workers: usize,
    timeout_ms: u64,
    output: Option<PathBuf>,
    quiet: bool,
) -> anyhow::Result<()> {
    let config = SweepConfig {
        workers,
        probe_timeout: Duration::from_millis(timeout_ms),
    };

    let total = range.host_count();
    print::header("network sweep", quiet);
    info!(
        "sweeping {} ({} hosts, {} workers)",
        range, total, config.workers
    );

    let engine = SweepEngine::new(Arc::new(PingProber));
    let sink = Arc::new(ProgressSink::new(total as u64, quiet));
    let handle = engine.start(&range, config, sink)?;

    let canceller = handle.canceller();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("cancel requested, letting in-flight probes drain");
            canceller.cancel();
        }
    });

    let outcome = handle.wait().await?;

    if let Some(path) = output.as_deref() {
        write_live_list(path, &outcome)?;
        info!("live list written to {}", path.display());
    }

    sweep_ends(&outcome, quiet);
    Ok(())
}

fn sweep_ends(outcome: &SweepOutcome, quiet: bool) {
    if !quiet && !outcome.live.is_empty() {
        print::header("live hosts", quiet);
        for (idx, addr) in outcome.live.iter().enumerate() {
            print::tree_head(idx, &addr.to_string());
        }
    }

    print_summary(outcome, quiet);

    if outcome.completed < outcome.total {
        warn!(
            "sweep cancelled after {}/{} probes",
            outcome.completed, outcome.total
        );
    }
}

fn print_summary(outcome: &SweepOutcome, quiet: bool) {
    let live: ColoredString = format!("{} live hosts", outcome.live.len()).bold().green();
    let elapsed: ColoredString = format!("{:.2}s", outcome.elapsed.as_secs_f64())
        .bold()
        .yellow();
    let line: ColoredString = format!("Sweep complete: {live} identified in {elapsed}")
        .color(colors::TEXT_DEFAULT);

    if quiet {
        info!("{line}");
    } else {
        print::fat_separator();
        print::centerln(&format!("{line}"));
    }
}

fn live_list_body(outcome: &SweepOutcome) -> String {
    outcome
        .live
        .iter()
        .map(|addr| format!("{addr}\n"))
        .collect()
}

fn write_live_list(path: &Path, outcome: &SweepOutcome) -> anyhow::Result<()> {
    std::fs::write(path, live_list_body(outcome))
        .with_context(|| format!("failed to write live list to {}", path.display()))
}
