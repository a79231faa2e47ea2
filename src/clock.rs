//! Clock abstraction
//!
//! The crawler's deadline and the profiler's timings are read from a [`Clock`]
//! rather than directly from the system time, so tests can drive time by hand.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Mutex, PoisonError};

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Returns the current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests
///
/// The clock only moves when told to, either explicitly through
/// [`FakeClock::advance`] / [`FakeClock::set`] or automatically by a fixed
/// tick after every read.
#[derive(Debug)]
pub struct FakeClock {
    current: Mutex<DateTime<Utc>>,
    tick: Duration,
}

impl FakeClock {
    /// Creates a clock frozen at `start`
    pub fn new(start: DateTime<Utc>) -> Self {
        Self::with_tick(start, Duration::zero())
    }

    /// Creates a clock that moves forward by `tick` after each call to `now`
    pub fn with_tick(start: DateTime<Utc>, tick: Duration) -> Self {
        Self {
            current: Mutex::new(start),
            tick,
        }
    }

    /// Moves the clock forward
    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        *current += by;
    }

    /// Moves the clock to an absolute instant
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = instant;
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        let now = *current;
        *current += self.tick;
        now
    }
}
