//! CPU affinity control and CPU enumeration
//!
//! The allowed CPU set is read once at startup and carried around as an
//! immutable [`CpuList`]. Pinning goes through `sched_setaffinity(0, ..)`,
//! which on Linux restricts only the calling thread.

use crate::error::{LatencyError, Result};
use nix::sched::{sched_getaffinity, sched_setaffinity, CpuSet};
use nix::unistd::Pid;
use std::fmt;
use std::process;

/// Which side of a pair a thread plays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The calling thread, which owns the timing window
    Initiator,
    /// The spawned peer thread
    Responder,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Initiator => write!(f, "initiator"),
            Role::Responder => write!(f, "responder"),
        }
    }
}

/// Restrict the calling thread to run only on `cpu`
pub fn pin_current(cpu: usize) -> Result<()> {
    let mut set = CpuSet::new();
    set.set(cpu).map_err(|source| LatencyError::Affinity {
        op: "CpuSet::set",
        cpu,
        source,
    })?;
    sched_setaffinity(Pid::from_raw(0), &set).map_err(|source| LatencyError::Affinity {
        op: "sched_setaffinity",
        cpu,
        source,
    })
}

/// Pin the calling thread or terminate the process
///
/// An unpinned thread invalidates every timing that follows, so there is no
/// recovery path: the failure is reported and the process exits with status 1.
pub fn pin_or_exit(cpu: usize, role: Role) {
    if let Err(e) = pin_current(cpu) {
        tracing::error!(%role, cpu, error = %e, "failed to pin thread");
        eprintln!("intercore: failed to pin {} thread: {}", role, e);
        process::exit(1);
    }
}

/// Ordered, immutable list of CPU ids taking part in a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuList {
    ids: Vec<usize>,
}

impl CpuList {
    /// Build a list from explicit ids (order is kept, duplicates rejected)
    pub fn new(ids: Vec<usize>) -> Result<Self> {
        for (pos, id) in ids.iter().enumerate() {
            if ids[..pos].contains(id) {
                return Err(LatencyError::InvalidCpuList(format!(
                    "CPU {} listed more than once",
                    id
                )));
            }
        }
        Ok(Self { ids })
    }

    /// Parse a list such as `0-3,8,10-11`, checking each id against `allowed`
    pub fn parse(text: &str, allowed: &CpuList) -> Result<Self> {
        let mut ids = Vec::new();
        for part in text.split(',').map(str::trim) {
            if part.is_empty() {
                return Err(LatencyError::InvalidCpuList(format!(
                    "empty entry in '{}'",
                    text
                )));
            }
            match part.split_once('-') {
                Some((lo, hi)) => {
                    let lo = parse_id(lo, text)?;
                    let hi = parse_id(hi, text)?;
                    if lo > hi {
                        return Err(LatencyError::InvalidCpuList(format!(
                            "descending range '{}'",
                            part
                        )));
                    }
                    // Bounds the expansion by the largest allowed id
                    if !allowed.contains(hi) {
                        return Err(LatencyError::CpuNotAllowed { cpu: hi });
                    }
                    ids.extend(lo..=hi);
                }
                None => ids.push(parse_id(part, text)?),
            }
        }

        if let Some(&cpu) = ids.iter().find(|id| !allowed.contains(**id)) {
            return Err(LatencyError::CpuNotAllowed { cpu });
        }

        Self::new(ids)
    }

    /// CPU ids in measurement order
    pub fn ids(&self) -> &[usize] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, cpu: usize) -> bool {
        self.ids.contains(&cpu)
    }

    /// Fail unless there is at least one pair to measure
    pub fn require_pair(&self) -> Result<()> {
        if self.ids.len() < 2 {
            return Err(LatencyError::TooFewCpus {
                found: self.ids.len(),
            });
        }
        Ok(())
    }
}

fn parse_id(s: &str, text: &str) -> Result<usize> {
    s.trim().parse::<usize>().map_err(|_| {
        LatencyError::InvalidCpuList(format!("'{}' is not a CPU id (in '{}')", s.trim(), text))
    })
}

/// Snapshot the CPUs the calling thread is currently allowed to run on
///
/// Call this once, before any pinning happens: later calls on a pinned thread
/// see only the CPU it was pinned to.
pub fn available_cpus() -> Result<CpuList> {
    let set = sched_getaffinity(Pid::from_raw(0)).map_err(|source| LatencyError::Affinity {
        op: "sched_getaffinity",
        cpu: 0,
        source,
    })?;

    let ids = (0..CpuSet::count())
        .filter(|&cpu| set.is_set(cpu).unwrap_or(false))
        .collect::<Vec<_>>();

    tracing::debug!(count = ids.len(), "enumerated allowed CPUs");
    Ok(CpuList { ids })
}
