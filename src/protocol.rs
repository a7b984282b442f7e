//! Hand-off protocols run between the two pinned threads of a pair
//!
//! Both protocols perform 100 request/acknowledge steps per sample, i.e. 200
//! one-way hand-offs, over the cells in [`HandoffCells`]:
//!
//! - **Flag exchange** (default, "data"): the initiator publishes step `n`
//!   in `a` with a release store and spins on `b` until the responder echoes
//!   `n` back. Pure load/store signalling.
//! - **Compare exchange** ("write"): both sides advance one counter in `a`
//!   from -1 up to 199 with contended CAS, the initiator writing even values
//!   and the responder odd ones. Exercises cache-line ownership transfer.
//!   `b` is only used for an untimed readiness barrier.
//!
//! Every spin is a bare loop: no `spin_loop()` hint and no yield, since
//! either would add to the latency being measured. Spins terminate only
//! because the peer is pinned to another, always-running core.

use crate::cell::{HandoffCells, SENTINEL};
use serde::Serialize;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

/// Request/acknowledge steps per sample
pub const STEPS: i32 = 100;

/// One-way hand-offs contained in one sample
pub const HOPS_PER_SAMPLE: u64 = 2 * STEPS as u64;

/// Final counter value of a compare-exchange sample
const LAST_CAS_VALUE: i32 = 2 * STEPS - 1;

/// Common interface of the two sides of a hand-off protocol
///
/// The sampler runs `respond` on the spawned thread and `initiate` on the
/// calling thread, once per sample, after resetting the cells.
pub trait Handoff: Sync {
    /// Responder side of one sample
    fn respond(&self, cells: &HandoffCells);

    /// Initiator side of one sample, returning the length of the timed window
    fn initiate(&self, cells: &HandoffCells) -> Duration;

    /// Number of one-way hand-offs the timed window covers
    fn hops_per_sample(&self) -> u64 {
        HOPS_PER_SAMPLE
    }
}

/// Acquire/release flag exchange over two cells
#[derive(Debug, Clone, Copy, Default)]
pub struct FlagExchange;

impl Handoff for FlagExchange {
    fn respond(&self, cells: &HandoffCells) {
        for n in 0..STEPS {
            while cells.a.load(Ordering::Acquire) != n {}
            cells.b.store(n, Ordering::Release);
        }
    }

    fn initiate(&self, cells: &HandoffCells) -> Duration {
        let start = Instant::now();
        for n in 0..STEPS {
            cells.a.store(n, Ordering::Release);
            while cells.b.load(Ordering::Acquire) != n {}
        }
        start.elapsed()
    }
}

/// Contended compare-and-exchange on a single counter
#[derive(Debug, Clone, Copy, Default)]
pub struct CompareExchange;

impl Handoff for CompareExchange {
    fn respond(&self, cells: &HandoffCells) {
        while cells.b.load(Ordering::Acquire) != 0 {}
        cells.b.store(1, Ordering::Release);

        for n in 0..STEPS {
            while cells
                .a
                .compare_exchange(2 * n, 2 * n + 1, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {}
        }
    }

    fn initiate(&self, cells: &HandoffCells) -> Duration {
        // Readiness barrier, outside the timed window
        cells.b.store(0, Ordering::Release);
        while cells.b.load(Ordering::Acquire) == 0 {}
        cells.b.store(SENTINEL, Ordering::Release);

        let start = Instant::now();
        for n in 0..STEPS {
            while cells
                .a
                .compare_exchange(2 * n - 1, 2 * n, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {}
        }
        // Wait for the responder's final write
        while cells.a.load(Ordering::Acquire) != LAST_CAS_VALUE {}
        start.elapsed()
    }
}

/// Protocol selected for a whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Protocol {
    #[default]
    FlagExchange,
    CompareExchange,
}

impl Protocol {
    /// Short label used in plot titles ("data" for reads, "write" for CAS)
    pub fn label(&self) -> &'static str {
        match self {
            Protocol::FlagExchange => "data",
            Protocol::CompareExchange => "write",
        }
    }
}

impl Handoff for Protocol {
    fn respond(&self, cells: &HandoffCells) {
        match self {
            Protocol::FlagExchange => FlagExchange.respond(cells),
            Protocol::CompareExchange => CompareExchange.respond(cells),
        }
    }

    fn initiate(&self, cells: &HandoffCells) -> Duration {
        match self {
            Protocol::FlagExchange => FlagExchange.initiate(cells),
            Protocol::CompareExchange => CompareExchange.initiate(cells),
        }
    }
}
