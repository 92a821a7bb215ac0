//! Wall-clock abstraction so timestamps are injectable in tests.

use chrono::{DateTime, Utc};

/// Source of the current time for `updated_at` and `started_at` stamps.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
