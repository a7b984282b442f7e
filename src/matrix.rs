//! Latency matrix and the builder that fills it
//!
//! The matrix is indexed by position in the [`CpuList`], not by CPU id.
//! Pairs are measured one at a time; each result is written to both
//! `[i][j]` and `[j][i]` after the pair's responder has been joined. The
//! diagonal is never measured and stays 0.

use crate::affinity::CpuList;
use crate::protocol::Handoff;
use crate::sampler::{self, SamplerConfig};
use serde::Serialize;
use std::time::Instant;

/// Square table of per-hop latencies in nanoseconds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatencyMatrix {
    cpus: Vec<usize>,
    data: Vec<u64>,
}

/// Off-diagonal statistics of a matrix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixSummary {
    pub min_ns: u64,
    pub max_ns: u64,
    pub mean_ns: f64,
}

impl LatencyMatrix {
    /// Zero-filled matrix dimensioned by `cpus`
    pub fn new(cpus: &CpuList) -> Self {
        let n = cpus.len();
        Self {
            cpus: cpus.ids().to_vec(),
            data: vec![0; n * n],
        }
    }

    /// Number of rows (and columns)
    pub fn dim(&self) -> usize {
        self.cpus.len()
    }

    /// CPU id of each row/column
    pub fn cpus(&self) -> &[usize] {
        &self.cpus
    }

    pub fn get(&self, i: usize, j: usize) -> u64 {
        self.data[i * self.dim() + j]
    }

    /// Store one pair's result in both halves
    pub fn set_pair(&mut self, i: usize, j: usize, latency_ns: u64) {
        let n = self.dim();
        self.data[i * n + j] = latency_ns;
        self.data[j * n + i] = latency_ns;
    }

    /// Row `i` as a slice
    pub fn row(&self, i: usize) -> &[u64] {
        let n = self.dim();
        &self.data[i * n..(i + 1) * n]
    }

    /// Rows as owned vectors
    pub fn rows(&self) -> Vec<Vec<u64>> {
        (0..self.dim()).map(|i| self.row(i).to_vec()).collect()
    }

    pub fn is_symmetric(&self) -> bool {
        pairs(self.dim()).all(|(i, j)| self.get(i, j) == self.get(j, i))
    }

    /// Min/max/mean over the measured (upper-triangle) entries
    pub fn summary(&self) -> Option<MatrixSummary> {
        let values: Vec<u64> = pairs(self.dim()).map(|(i, j)| self.get(i, j)).collect();
        let min_ns = *values.iter().min()?;
        let max_ns = *values.iter().max()?;
        let mean_ns = values.iter().sum::<u64>() as f64 / values.len() as f64;
        Some(MatrixSummary {
            min_ns,
            max_ns,
            mean_ns,
        })
    }
}

/// Every unordered pair `(i, j)` with `i < j` over `n` positions
pub fn pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
}

/// Measure every pair of `cpus` and return the filled matrix
///
/// For pair `(i, j)` the responder runs on `cpus[i]` and the initiator (the
/// calling thread) on `cpus[j]`; both directions are assumed equal. The
/// calling thread is left pinned to the last initiator CPU.
pub fn build<H: Handoff>(cpus: &CpuList, protocol: &H, config: &SamplerConfig) -> LatencyMatrix {
    tracing::info!(
        samples = config.samples.get(),
        warmup = config.warmup,
        "sampling parameters"
    );
    build_with(cpus, |initiator, responder| {
        sampler::measure(initiator, responder, protocol, config)
    })
}

/// Fill a matrix using `measure_pair(initiator_cpu, responder_cpu)` per pair
pub fn build_with<F>(cpus: &CpuList, mut measure_pair: F) -> LatencyMatrix
where
    F: FnMut(usize, usize) -> u64,
{
    let ids = cpus.ids();
    let mut matrix = LatencyMatrix::new(cpus);
    let total = ids.len() * ids.len().saturating_sub(1) / 2;
    let started = Instant::now();

    tracing::info!(cpus = ids.len(), pairs = total, "building latency matrix");

    for (done, (i, j)) in pairs(ids.len()).enumerate() {
        let latency = measure_pair(ids[j], ids[i]);
        matrix.set_pair(i, j, latency);
        tracing::debug!(
            pair = done + 1,
            of = total,
            cpu_a = ids[i],
            cpu_b = ids[j],
            latency_ns = latency,
            "pair complete"
        );
    }

    tracing::info!(elapsed_ms = started.elapsed().as_millis() as u64, "matrix complete");
    matrix
}
