pub mod sweep;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sweepr_common::config::{DEFAULT_PROBE_TIMEOUT_MS, DEFAULT_WORKERS};
use sweepr_common::network::range::HostRange;

#[derive(Parser)]
#[command(name = "sweepr")]
#[command(about = "A concurrent liveness sweep for IPv4 ranges.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe every host in a range and report the live ones
    #[command(alias = "s")]
    Sweep {
        /// CIDR block to sweep, e.g. 192.168.1.0/24
        range: HostRange,

        /// Number of concurrent probe workers
        #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
        workers: usize,

        /// Per-probe wait in milliseconds
        #[arg(short, long, default_value_t = DEFAULT_PROBE_TIMEOUT_MS)]
        timeout_ms: u64,

        /// Write live addresses to this file, one per line
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only print the final summary
        #[arg(short, long)]
        quiet: bool,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
