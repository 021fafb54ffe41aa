// SPDX-License-Identifier: MIT OR Apache-2.0
//! Time sources for asynchronous nodes.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// A millisecond time source
pub trait Clock: Send + Sync {
    /// Current time in milliseconds
    fn now_ms(&self) -> f64;
}

/// Wall clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

/// A clock that only moves when told to
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<Mutex<f64>>,
}

impl ManualClock {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward
    pub fn advance(&self, ms: f64) {
        *self.now.lock() += ms;
    }

    /// Jump to an absolute time
    pub fn set(&self, ms: f64) {
        *self.now.lock() = ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_is_shared_between_clones() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(250.0);
        assert_eq!(clock.now_ms(), 250.0);
        clock.set(10.0);
        assert_eq!(handle.now_ms(), 10.0);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now_ms();
        assert!(clock.now_ms() >= a);
    }
}
