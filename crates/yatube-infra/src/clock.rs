//! Clock implementations.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, TimeDelta, Utc};

pub use yatube_core::ports::SystemClock;
use yatube_core::ports::Clock;

/// Clock that only moves when told to. Used by tests to control timestamps
/// and cache expiry.
///
/// With a non-zero tick every call to `now` advances the clock by that step,
/// so consecutive rows get strictly increasing timestamps.
#[derive(Debug)]
pub struct ManualClock {
    micros: AtomicI64,
    tick_micros: i64,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            micros: AtomicI64::new(start.timestamp_micros()),
            tick_micros: 0,
        }
    }

    /// A clock that advances by `step` after every reading.
    pub fn ticking(start: DateTime<Utc>, step: TimeDelta) -> Self {
        Self {
            micros: AtomicI64::new(start.timestamp_micros()),
            tick_micros: step.num_microseconds().unwrap_or(0),
        }
    }

    pub fn advance(&self, by: TimeDelta) {
        self.micros
            .fetch_add(by.num_microseconds().unwrap_or(0), Ordering::SeqCst);
    }

    pub fn set(&self, to: DateTime<Utc>) {
        self.micros.store(to.timestamp_micros(), Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let micros = self.micros.fetch_add(self.tick_micros, Ordering::SeqCst);
        DateTime::from_timestamp_micros(micros).unwrap_or_default()
    }
}
