//! Time source used for record timestamps and report generation.
//!
//! # Invariants
//! - `ManualClock` never moves backwards.
//! - Clones of a `ManualClock` observe the same instant.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for deterministic tests and replays.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub fn at(start: DateTime<Utc>) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    /// Moves time forward by `step` and returns the new instant.
    ///
    /// Negative steps are ignored.
    pub fn advance(&self, step: Duration) -> DateTime<Utc> {
        let mut current = self.current.lock();
        if step > Duration::zero() {
            *current += step;
        }
        *current
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, ManualClock};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn manual_clock_advances_and_shares_state_across_clones() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let clock = ManualClock::at(start);
        let observer = clock.clone();

        clock.advance(Duration::seconds(90));
        assert_eq!(observer.now(), start + Duration::seconds(90));
    }

    #[test]
    fn manual_clock_ignores_negative_steps() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let clock = ManualClock::at(start);

        assert_eq!(clock.advance(Duration::seconds(-5)), start);
    }
}
