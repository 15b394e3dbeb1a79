#![forbid(unsafe_code)]

//! Frame clocks.
//!
//! The state machine only ever sees plain monotonic milliseconds. A
//! [`FrameClock`] is how a host produces them: [`MonotonicClock`] for real
//! rendering loops (wasm-safe via `web-time`), [`ManualClock`] for tests and
//! scripted simulations.

use std::time::Duration;

use web_time::Instant;

/// Source of monotonic frame timestamps in milliseconds.
pub trait FrameClock {
    fn now_ms(&self) -> u64;
}

/// Wall-clock milliseconds since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualClock {
    now_ms: u64,
}

impl ManualClock {
    #[must_use]
    pub fn new(start_ms: u64) -> Self {
        Self { now_ms: start_ms }
    }

    /// Move forward by `dt`, returning the new time.
    pub fn advance(&mut self, dt: Duration) -> u64 {
        let step = u64::try_from(dt.as_millis()).unwrap_or(u64::MAX);
        self.now_ms = self.now_ms.saturating_add(step);
        self.now_ms
    }

    /// Jump to `now_ms`. Time never moves backwards.
    pub fn set(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}

impl FrameClock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let mut clock = ManualClock::new(10);
        assert_eq!(clock.now_ms(), 10);
        assert_eq!(clock.advance(Duration::from_millis(16)), 26);
        assert_eq!(clock.now_ms(), 26);
    }

    #[test]
    fn manual_clock_is_monotonic() {
        let mut clock = ManualClock::new(100);
        clock.set(50);
        assert_eq!(clock.now_ms(), 100);
        clock.set(150);
        assert_eq!(clock.now_ms(), 150);
    }

    #[test]
    fn manual_clock_saturates() {
        let mut clock = ManualClock::new(u64::MAX - 1);
        assert_eq!(clock.advance(Duration::from_secs(1)), u64::MAX);
    }

    #[test]
    fn monotonic_clock_never_goes_back() {
        let clock = MonotonicClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
