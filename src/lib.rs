//! Intercore - inter-core one-way latency measurement
//!
//! For every pair of CPUs the process may run on, one thread is pinned to
//! each CPU and the pair exchanges a fixed number of hand-offs over a shared
//! cache line. The minimum sample, divided by the number of one-way
//! hand-offs, becomes that pair's entry in a symmetric latency matrix.

pub mod affinity;
pub mod cell;
pub mod cli;
pub mod error;
pub mod matrix;
pub mod plot;
pub mod protocol;
pub mod report;
pub mod sampler;
pub mod warmup;

pub use error::{LatencyError, Result};
