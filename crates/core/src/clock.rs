//! Time source for the ledger operations.
//!
//! Lock/unlock boundaries and penalty decisions are all relative to "now",
//! so the current time is injected rather than read from the system inside
//! the operations. Tests pin it to a fixed instant.

use chrono::{DateTime, Utc};

/// Provides the current timestamp.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
