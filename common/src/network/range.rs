//! # Sweep Range Model
//!
//! Parses the textual network expression a sweep runs against.
//!
//! Supported formats:
//! * A CIDR block (e.g., `192.168.1.0/24`).
//! * A single IPv4 address, treated as a /32.
//!
//! Expansion follows host semantics: network and broadcast addresses
//! are excluded for prefixes up to /30, while /31 and /32 expose every
//! address (RFC 3021). Enumeration is ascending and deterministic, so
//! consumers may key results by address or by ordinal.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use ipnet::{Ipv4AddrRange, Ipv4Net};
use thiserror::Error;

/// Raised when a range expression is not a valid network or prefix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid network range '{expr}'")]
pub struct RangeParseError {
    pub expr: String,
}

/// An immutable, finite set of sweepable host addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRange {
    expr: String,
    net: Ipv4Net,
}

impl HostRange {
    /// The expression this range was parsed from.
    pub fn expr(&self) -> &str {
        &self.expr
    }

    /// The normalized network block (host bits truncated).
    pub fn network(&self) -> Ipv4Net {
        self.net
    }

    /// Usable host addresses, ascending.
    pub fn hosts(&self) -> Ipv4AddrRange {
        self.net.hosts()
    }

    /// Number of usable host addresses, consistent with [`Self::hosts`].
    pub fn host_count(&self) -> usize {
        match 32 - self.net.prefix_len() {
            0 => 1,
            1 => 2,
            bits => ((1u64 << bits) - 2) as usize,
        }
    }
}

impl FromStr for HostRange {
    type Err = RangeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let expr = s.trim();

        let parsed = if expr.contains('/') {
            expr.parse::<Ipv4Net>().ok()
        } else {
            expr.parse::<Ipv4Addr>()
                .ok()
                .and_then(|addr| Ipv4Net::new(addr, 32).ok())
        };

        match parsed {
            Some(net) => Ok(Self {
                expr: expr.to_string(),
                net: net.trunc(),
            }),
            None => Err(RangeParseError {
                expr: expr.to_string(),
            }),
        }
    }
}

impl fmt::Display for HostRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.net)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
