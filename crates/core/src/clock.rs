// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling
//!
//! Two notions of time are needed: a monotonic [`Instant`] for debounce and
//! tick deadlines, and wall-clock milliseconds for the timestamps that end up
//! in persisted slices.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// A clock that provides the current time
pub trait Clock: Clone + Send + Sync {
    /// Monotonic time, used for timer deadlines
    fn now(&self) -> Instant;

    /// Milliseconds since the Unix epoch, used for stored timestamps
    fn epoch_millis(&self) -> u64;

    /// Block the caller for `duration` (retry backoff)
    fn sleep(&self, duration: Duration);
}

/// Real system clock
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn epoch_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

struct FakeTime {
    instant: Instant,
    epoch_millis: u64,
    slept: Vec<Duration>,
}

/// Fake clock for testing with controllable time
///
/// Sleeping on a fake clock advances it instead of blocking, and the
/// requested durations are recorded so backoff schedules can be asserted.
#[derive(Clone)]
pub struct FakeClock {
    current: Arc<Mutex<FakeTime>>,
}

impl FakeClock {
    /// Wall-clock start used by [`FakeClock::new`] (2026-01-01T00:00:00Z)
    pub const DEFAULT_EPOCH_MILLIS: u64 = 1_767_225_600_000;

    pub fn new() -> Self {
        Self::at_epoch_millis(Self::DEFAULT_EPOCH_MILLIS)
    }

    /// Create a fake clock whose wall clock starts at `epoch_millis`
    pub fn at_epoch_millis(epoch_millis: u64) -> Self {
        Self {
            current: Arc::new(Mutex::new(FakeTime {
                instant: Instant::now(),
                epoch_millis,
                slept: Vec::new(),
            })),
        }
    }

    /// Advance the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        current.instant += duration;
        current.epoch_millis += duration.as_millis() as u64;
    }

    /// Durations passed to [`Clock::sleep`] so far, in call order
    pub fn slept(&self) -> Vec<Duration> {
        let current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        current.slept.clone()
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .instant
    }

    fn epoch_millis(&self) -> u64 {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .epoch_millis
    }

    fn sleep(&self, duration: Duration) {
        {
            let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
            current.slept.push(duration);
        }
        self.advance(duration);
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
