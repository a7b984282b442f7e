//! Shared hand-off cells
//!
//! Each cell is an `AtomicI32` padded to its own cache line so the two cells
//! of a pair never share a line with each other or with anything else.

use crossbeam::utils::CachePadded;
use std::sync::atomic::{AtomicI32, Ordering};

/// Value a cell holds before its producer has written anything
pub const SENTINEL: i32 = -1;

/// The two cells one pair's measurement works over
///
/// `a` carries initiator → responder signals; `b` carries responder →
/// initiator signals (or the readiness handshake, for compare-exchange).
#[derive(Debug)]
pub struct HandoffCells {
    pub a: CachePadded<AtomicI32>,
    pub b: CachePadded<AtomicI32>,
}

impl HandoffCells {
    /// Create both cells holding [`SENTINEL`]
    pub fn new() -> Self {
        Self {
            a: CachePadded::new(AtomicI32::new(SENTINEL)),
            b: CachePadded::new(AtomicI32::new(SENTINEL)),
        }
    }

    /// Put both cells back to [`SENTINEL`] ahead of the next sample
    pub fn reset(&self) {
        self.a.store(SENTINEL, Ordering::Release);
        self.b.store(SENTINEL, Ordering::Release);
    }
}

impl Default for HandoffCells {
    fn default() -> Self {
        Self::new()
    }
}
