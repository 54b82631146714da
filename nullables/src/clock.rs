//! Nullable clock — deterministic time for testing.

use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Mutex;

use blocktime_types::Clock;

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to.
pub struct NullClock {
    current: Mutex<DateTime<Utc>>,
}

impl NullClock {
    pub fn new(initial: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(initial),
        }
    }

    /// Advance time by `delta`.
    pub fn advance(&self, delta: TimeDelta) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current += delta;
    }

    /// Set the time to a specific value.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }
}

impl Clock for NullClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}
