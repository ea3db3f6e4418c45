//! Clock and randomness source for timestamps and locally generated ids.
//!
//! Stores never call `Utc::now()` or the RNG directly; they go through a
//! [`Clock`] so tests can pin both.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;

/// Source of the current time and of random back-dating offsets.
pub trait Clock: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;

    /// A random offset in `[0, max)`. Returns zero when `max` is not positive.
    fn random_offset(&self, max: TimeDelta) -> TimeDelta;

    /// Current time as Unix milliseconds, clamped at zero.
    fn now_millis(&self) -> u64 {
        u64::try_from(self.now().timestamp_millis()).unwrap_or(0)
    }
}

/// Real time and `rand`'s thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn random_offset(&self, max: TimeDelta) -> TimeDelta {
        let max_ms = max.num_milliseconds();
        if max_ms <= 0 {
            return TimeDelta::zero();
        }
        TimeDelta::milliseconds(rand::rng().random_range(0..max_ms))
    }
}

/// Deterministic clock: a settable instant and a constant offset.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
    offset: TimeDelta,
}

impl FixedClock {
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now), offset: TimeDelta::zero() }
    }

    /// Use `offset` (capped at the requested maximum) for every random draw.
    #[must_use]
    pub fn with_offset(mut self, offset: TimeDelta) -> Self {
        self.offset = offset;
        self
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn random_offset(&self, max: TimeDelta) -> TimeDelta {
        if max <= TimeDelta::zero() {
            return TimeDelta::zero();
        }
        self.offset.clamp(TimeDelta::zero(), max - TimeDelta::milliseconds(1))
    }
}

#[cfg(test)]
#[path = "clock_test.rs"]
mod tests;
