//! Unit tests for the task lifecycle engine.

mod service_tests;

use chrono::{DateTime, Duration, TimeZone, Utc};
use mockable::MockClock;
use std::sync::{Arc, Mutex};

/// Manually advanced time source shared between a test and its clock.
#[derive(Clone)]
pub(super) struct ManualTime(Arc<Mutex<DateTime<Utc>>>);

impl ManualTime {
    pub(super) fn starting_at_noon() -> Self {
        let noon = Utc
            .with_ymd_and_hms(2026, 10, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        Self(Arc::new(Mutex::new(noon)))
    }

    pub(super) fn now(&self) -> DateTime<Utc> {
        *self.0.lock().expect("time lock")
    }

    pub(super) fn advance_seconds(&self, seconds: i64) {
        let mut now = self.0.lock().expect("time lock");
        *now += Duration::seconds(seconds);
    }

    pub(super) fn clock(&self) -> MockClock {
        let shared = Arc::clone(&self.0);
        let mut clock = MockClock::new();
        clock
            .expect_utc()
            .returning(move || *shared.lock().expect("time lock"));
        clock
    }
}
