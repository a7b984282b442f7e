//! Pair sampler: min-of-N latency for one ordered CPU pair
//!
//! The responder runs on a scoped thread pinned to `responder_cpu`; the
//! calling thread pins itself to `initiator_cpu` and owns the timing window.
//! The shared cells live exactly as long as the scope, so ownership ends at
//! the join.

use crate::affinity::{self, Role};
use crate::cell::HandoffCells;
use crate::error::{LatencyError, Result};
use crate::protocol::Handoff;
use crate::warmup;
use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;

/// Default number of samples per pair
pub const DEFAULT_SAMPLES: u32 = 1000;

/// Per-pair sampling parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Samples taken per pair; the minimum is kept
    pub samples: NonZeroU32,
    /// Spin both threads for 200 ms before the first sample
    pub warmup: bool,
}

impl SamplerConfig {
    pub fn new(samples: u32, warmup: bool) -> Result<Self> {
        let samples = NonZeroU32::new(samples).ok_or(LatencyError::InvalidSamples)?;
        Ok(Self { samples, warmup })
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            samples: NonZeroU32::new(DEFAULT_SAMPLES).unwrap_or(NonZeroU32::MIN),
            warmup: false,
        }
    }
}

/// Measure the one-way latency between two CPUs, in nanoseconds
///
/// Pins the calling thread to `initiator_cpu` (it stays pinned afterwards)
/// and a fresh responder thread to `responder_cpu`. A pinning failure on
/// either side terminates the process.
///
/// Does not return if the responder never makes progress.
pub fn measure<H: Handoff>(
    initiator_cpu: usize,
    responder_cpu: usize,
    protocol: &H,
    config: &SamplerConfig,
) -> u64 {
    let samples = config.samples.get();
    let cells = HandoffCells::new();

    let min_elapsed = thread::scope(|s| {
        s.spawn(|| {
            affinity::pin_or_exit(responder_cpu, Role::Responder);
            if config.warmup {
                warmup::warmup();
            }
            for _ in 0..samples {
                protocol.respond(&cells);
            }
        });

        affinity::pin_or_exit(initiator_cpu, Role::Initiator);
        if config.warmup {
            warmup::warmup();
        }

        let mut min_elapsed = Duration::MAX;
        for _ in 0..samples {
            cells.reset();
            min_elapsed = min_elapsed.min(protocol.initiate(&cells));
        }
        min_elapsed
    });

    let latency = per_hop_latency(min_elapsed, protocol.hops_per_sample());
    tracing::debug!(
        initiator_cpu,
        responder_cpu,
        samples,
        min_elapsed_ns = min_elapsed.as_nanos() as u64,
        latency_ns = latency,
        "measured pair"
    );
    latency
}

/// Split a sample's elapsed time evenly over its one-way hand-offs
pub fn per_hop_latency(elapsed: Duration, hops: u64) -> u64 {
    let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
    nanos / hops.max(1)
}
