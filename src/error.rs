//! Error types for the latency instrument
//!
//! Only pinning failures are fatal during a measurement; everything else here
//! is rejected up front, before the first pair is measured.

use thiserror::Error;

/// Errors that can occur while preparing or reporting a latency run
#[derive(Error, Debug)]
pub enum LatencyError {
    #[error("{op} failed for CPU {cpu}: {source}")]
    Affinity {
        op: &'static str,
        cpu: usize,
        #[source]
        source: nix::Error,
    },

    #[error("CPU {cpu} is not in the allowed CPU set of this process")]
    CpuNotAllowed { cpu: usize },

    #[error("Need at least 2 CPUs to measure a pair, found {found}")]
    TooFewCpus { found: usize },

    #[error("Invalid CPU list: {0}")]
    InvalidCpuList(String),

    #[error("Sample count must be at least 1")]
    InvalidSamples,

    #[error("JSON serialization failed: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for latency operations
pub type Result<T> = std::result::Result<T, LatencyError>;
