//! Time source for round and match timers.

use chrono::{DateTime, Duration, Utc};
use std::sync::RwLock;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Frozen clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    frozen_time: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(frozen_time: DateTime<Utc>) -> Self {
        Self {
            frozen_time: RwLock::new(frozen_time),
        }
    }

    /// Create a clock frozen at the current wall time
    pub fn now_frozen() -> Self {
        Self::new(Utc::now())
    }

    pub fn advance(&self, duration: Duration) {
        let mut time = self.frozen_time.write().unwrap_or_else(|e| e.into_inner());
        *time = *time + duration;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.frozen_time.read().unwrap_or_else(|e| e.into_inner())
    }
}

/// Milliseconds from `start` to `end`, clamped at zero
pub fn elapsed_ms(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    (end - start).num_milliseconds().max(0) as u64
}
