// Shared helpers for the pair-latency integration tests
//
// Stub peers implement `Handoff` directly on the shared cells so the
// sampler and builder can be driven with known timing.

#![allow(dead_code)]

use intercore::affinity::{available_cpus, CpuList};
use intercore::cell::HandoffCells;
use intercore::protocol::{FlagExchange, Handoff, STEPS};
use intercore::warmup::spin_for;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

/// First `n` allowed CPUs, or `None` when the machine has fewer
///
/// The skip note goes straight to the stderr handle: libtest captures
/// `eprintln!` output of passing tests, which would hide the skip.
pub fn cpus_or_skip(n: usize) -> Option<CpuList> {
    let all = available_cpus().expect("sched_getaffinity");
    if all.len() < n {
        let current = thread::current();
        let test = current.name().unwrap_or("<unnamed>");
        let _ = writeln!(
            io::stderr(),
            "SKIPPED {}: needs {} CPUs, {} available",
            test,
            n,
            all.len()
        );
        return None;
    }
    Some(CpuList::new(all.ids()[..n].to_vec()).expect("distinct ids"))
}

/// `--cpus` argument naming the first `n` allowed CPUs
pub fn cpu_arg(n: usize) -> Option<String> {
    cpus_or_skip(n).map(|list| {
        list.ids()
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",")
    })
}

/// Initiator returns scripted durations in order; responder is a no-op
pub struct ScriptedHandoff {
    elapsed: Vec<Duration>,
    next: AtomicUsize,
}

impl ScriptedHandoff {
    pub fn from_nanos(nanos: &[u64]) -> Self {
        Self {
            elapsed: nanos.iter().map(|&ns| Duration::from_nanos(ns)).collect(),
            next: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.next.load(Ordering::Relaxed)
    }
}

impl Handoff for ScriptedHandoff {
    fn respond(&self, _cells: &HandoffCells) {}

    fn initiate(&self, _cells: &HandoffCells) -> Duration {
        let i = self.next.fetch_add(1, Ordering::Relaxed);
        self.elapsed[i % self.elapsed.len()]
    }
}

/// Flag-exchange peer that spends `2 * hop` before acknowledging each step
pub struct DelayedFlagPeer {
    pub hop: Duration,
}

impl Handoff for DelayedFlagPeer {
    fn respond(&self, cells: &HandoffCells) {
        for n in 0..STEPS {
            while cells.a.load(Ordering::Acquire) != n {}
            spin_for(self.hop * 2);
            cells.b.store(n, Ordering::Release);
        }
    }

    fn initiate(&self, cells: &HandoffCells) -> Duration {
        FlagExchange.initiate(cells)
    }
}

/// Compare-exchange peer that spends `2 * hop` on each of its turns
pub struct DelayedCasPeer {
    pub hop: Duration,
}

impl Handoff for DelayedCasPeer {
    fn respond(&self, cells: &HandoffCells) {
        while cells.b.load(Ordering::Acquire) != 0 {}
        cells.b.store(1, Ordering::Release);

        for n in 0..STEPS {
            while cells.a.load(Ordering::Acquire) != 2 * n {}
            spin_for(self.hop * 2);
            while cells
                .a
                .compare_exchange(2 * n, 2 * n + 1, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {}
        }
    }

    fn initiate(&self, cells: &HandoffCells) -> Duration {
        intercore::protocol::CompareExchange.initiate(cells)
    }
}

/// Flag-exchange peer that is not scheduled until `release` is set
#[derive(Default)]
pub struct StarvedPeer {
    pub release: AtomicBool,
}

impl Handoff for StarvedPeer {
    fn respond(&self, cells: &HandoffCells) {
        while !self.release.load(Ordering::Acquire) {}
        FlagExchange.respond(cells);
    }

    fn initiate(&self, cells: &HandoffCells) -> Duration {
        FlagExchange.initiate(cells)
    }
}
