//! Time source abstraction
//!
//! Deadlines are nanoseconds since the Unix epoch. Production code uses
//! [`SystemClock`]; tests drive expiry with `ManualClock` (available under
//! `cfg(test)` or the `testing` feature).

use std::fmt::Debug;

#[cfg(any(test, feature = "testing"))]
use std::sync::atomic::{AtomicI64, Ordering};
#[cfg(any(test, feature = "testing"))]
use std::time::Duration;

pub trait Clock: Send + Sync + Debug {
    /// Current time as nanoseconds since the Unix epoch.
    fn now_nanos(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_nanos(&self) -> i64 {
        // Out of range only after the year 2262.
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
    }
}

/// Clock that only moves when told to.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug)]
pub struct ManualClock {
    nanos: AtomicI64,
}

#[cfg(any(test, feature = "testing"))]
impl ManualClock {
    pub fn new(nanos: i64) -> Self {
        Self {
            nanos: AtomicI64::new(nanos),
        }
    }

    /// Start at the current wall-clock time.
    pub fn starting_now() -> Self {
        Self::new(SystemClock.now_nanos())
    }

    pub fn set(&self, nanos: i64) {
        self.nanos.store(nanos, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(crate::domain::session::duration_nanos(by), Ordering::SeqCst);
    }
}

#[cfg(any(test, feature = "testing"))]
impl Clock for ManualClock {
    fn now_nanos(&self) -> i64 {
        self.nanos.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_nanosecond_epoch() {
        let now = SystemClock.now_nanos();
        // After 2020-01-01 in nanoseconds
        assert!(now > 1_577_836_800_000_000_000);
    }

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.now_nanos(), 1_000);
        clock.advance(Duration::from_micros(2));
        assert_eq!(clock.now_nanos(), 3_000);
        clock.set(10);
        assert_eq!(clock.now_nanos(), 10);
    }
}
