//! The concurrent reachability sweep engine.
//!
//! [`sweep::SweepEngine`] expands a host range, drives a bounded pool
//! of [`probe::Prober`] workers across it, and streams progress and
//! per-address results to a [`event::SweepSink`]. Presentation layers
//! (terminal, batch writers) are consumers of that sink and of the
//! final [`event::SweepOutcome`]; they never reach into engine state.

pub mod error;
pub mod event;
pub mod probe;
pub mod sweep;
