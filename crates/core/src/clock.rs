// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for timestamping statement lifecycle events.
//!
//! The executor stamps `start_time`/`end_time` on every statement (spec
//! §3.1, §9 "Per-call timing") and the host persists those timestamps.
//! Going through a trait instead of calling `Instant::now()`/`SystemTime::now()`
//! directly lets tests assert exact elapsed durations with a fake clock.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Produces monotonic instants and wall-clock epoch milliseconds.
pub trait Clock: Clone + Send + Sync + 'static {
    /// A monotonic instant, used for `Duration` arithmetic between two
    /// timestamps within the same process.
    fn now(&self) -> Instant;

    /// Wall-clock milliseconds since the Unix epoch, used for persisted,
    /// cross-process-comparable timestamps.
    fn epoch_ms(&self) -> u64;
}

/// Production clock backed by the OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn epoch_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::Clock;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    #[derive(Debug)]
    struct FakeClockState {
        anchor: Instant,
        offset: Duration,
        epoch_ms: u64,
    }

    /// Deterministic clock for tests: `now()` returns a fixed `Instant` that
    /// can be advanced with [`FakeClock::advance`], and `epoch_ms()` returns
    /// an independently settable counter.
    #[derive(Debug, Clone)]
    pub struct FakeClock {
        inner: Arc<Mutex<FakeClockState>>,
    }

    impl FakeClock {
        pub fn new(epoch_ms: u64) -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeClockState {
                    anchor: Instant::now(),
                    offset: Duration::ZERO,
                    epoch_ms,
                })),
            }
        }

        /// Move both the monotonic and epoch readings forward by `delta`.
        pub fn advance(&self, delta: Duration) {
            let mut inner = self.inner.lock();
            inner.offset += delta;
            inner.epoch_ms += delta.as_millis() as u64;
        }

        /// Set the epoch reading directly, independent of `advance`.
        pub fn set_epoch_ms(&self, epoch_ms: u64) {
            self.inner.lock().epoch_ms = epoch_ms;
        }
    }

    impl Default for FakeClock {
        fn default() -> Self {
            Self::new(0)
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> Instant {
            let inner = self.inner.lock();
            inner.anchor + inner.offset
        }

        fn epoch_ms(&self) -> u64 {
            self.inner.lock().epoch_ms
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeClock;

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
