use std::net::IpAddr;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use sweepr_core::event::{SweepOutcome, SweepSink};

/// Renders a running sweep as a progress bar with live-host lines
/// printed above it.
///
/// The engine only reports raw counts; the percent ladder on the bar
/// is derived here by indicatif.
pub struct ProgressSink {
    bar: ProgressBar,
    quiet: bool,
}

impl ProgressSink {
    pub fn new(total: u64, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(total)
        };

        let style = ProgressStyle::with_template("{bar:40.green} {percent:>3}% ({pos}/{len})")
            .unwrap();
        bar.set_style(style);

        Self { bar, quiet }
    }
}

impl SweepSink for ProgressSink {
    fn on_progress(&self, processed: usize, _total: usize) {
        self.bar.set_position(processed as u64);
    }

    fn on_result(&self, addr: IpAddr, alive: bool) {
        if alive && !self.quiet {
            self.bar.println(format!(
                "{} {} is alive",
                "[+]".green().bold(),
                addr.to_string().cyan()
            ));
        }
    }

    fn on_complete(&self, _outcome: &SweepOutcome) {
        self.bar.finish_and_clear();
    }
}
