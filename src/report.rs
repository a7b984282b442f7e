//! Rendering of a latency matrix as text, JSON or CSV
//!
//! Rows and columns can be shown in an SMT-interleaved order, which places
//! CPU k next to CPU k + n/2 (the usual numbering of hyper-thread siblings).

use crate::error::Result;
use crate::matrix::{LatencyMatrix, MatrixSummary};
use crate::protocol::Protocol;
use crate::sampler::SamplerConfig;
use serde::Serialize;

/// Matrix positions in the order they are displayed
///
/// With `smt`, display slot `i` shows position `(i >> 1) + (i & 1) * n / 2`.
/// Interleaving only makes sense for an even count; odd counts keep the
/// measurement order.
pub fn display_order(n: usize, smt: bool) -> Vec<usize> {
    if smt && n % 2 == 0 {
        (0..n).map(|i| (i >> 1) + (i & 1) * n / 2).collect()
    } else {
        (0..n).collect()
    }
}

/// Fixed-width table: a `CPU` header row, then one row per CPU
pub fn render_text(matrix: &LatencyMatrix, order: &[usize]) -> String {
    let cpus = matrix.cpus();
    let mut out = format!("{:>4}", "CPU");
    for &c in order {
        out.push_str(&format!(" {:>4}", cpus[c]));
    }
    out.push('\n');

    for &r in order {
        out.push_str(&format!("{:>4}", cpus[r]));
        for &c in order {
            out.push_str(&format!(" {:>4}", matrix.get(r, c)));
        }
        out.push('\n');
    }
    out
}

/// CSV with a `cpu` header column
pub fn render_csv(matrix: &LatencyMatrix, order: &[usize]) -> String {
    let cpus = matrix.cpus();
    let mut header = vec!["cpu".to_string()];
    header.extend(order.iter().map(|&c| cpus[c].to_string()));

    let mut out = header.join(",");
    out.push('\n');
    for &r in order {
        let mut fields = vec![cpus[r].to_string()];
        fields.extend(order.iter().map(|&c| matrix.get(r, c).to_string()));
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    pub protocol: Protocol,
    pub samples: u32,
    pub warmup: bool,
    /// CPU ids in row order
    pub cpus: Vec<usize>,
    /// Per-hop latency in nanoseconds, `latency_ns[row][col]`
    pub latency_ns: Vec<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<MatrixSummary>,
}

impl JsonReport {
    pub fn new(
        matrix: &LatencyMatrix,
        order: &[usize],
        protocol: Protocol,
        config: &SamplerConfig,
    ) -> Self {
        Self {
            protocol,
            samples: config.samples.get(),
            warmup: config.warmup,
            cpus: order.iter().map(|&i| matrix.cpus()[i]).collect(),
            latency_ns: order
                .iter()
                .map(|&r| order.iter().map(|&c| matrix.get(r, c)).collect())
                .collect(),
            summary: matrix.summary(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
