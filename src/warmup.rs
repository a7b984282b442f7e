//! Busy-wait warm-up before measurement
//!
//! Spins on the monotonic clock so the core leaves any idle/low-frequency
//! state before the first timed sample. Never called inside a timed window.

use std::time::{Duration, Instant};

/// Fixed warm-up period
pub const WARMUP_DURATION: Duration = Duration::from_millis(200);

/// Spin until [`WARMUP_DURATION`] has elapsed
pub fn warmup() {
    spin_for(WARMUP_DURATION);
}

/// Spin on the monotonic clock for at least `duration`, never yielding
pub fn spin_for(duration: Duration) {
    let start = Instant::now();
    while start.elapsed() < duration {
        // busy spin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spin_for_waits_at_least_duration() {
        let start = Instant::now();
        spin_for(Duration::from_millis(15));
        assert!(start.elapsed() >= Duration::from_millis(15));
    }

    #[test]
    fn test_warmup_takes_200ms() {
        let start = Instant::now();
        warmup();
        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[test]
    fn test_spin_for_zero_returns_immediately() {
        let start = Instant::now();
        spin_for(Duration::ZERO);
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
