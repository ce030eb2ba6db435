//! Clock seam for deterministic time in tests.

use chrono::DateTime;
use chrono::Utc;

/// Source of the current UTC instant.
///
/// Evaluators take a [`Clock`] instead of calling `Utc::now()` directly so
/// tests can drive them with a fixed or stepped clock.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Wall clock used in production.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
