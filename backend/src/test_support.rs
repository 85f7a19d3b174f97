//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`, via
//! the `test-support` feature). Lock poisoning panics: these types only run
//! inside tests.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;
use tokio::sync::watch;

use crate::domain::ScanSleeper;

pub mod fixtures;
pub mod memory;
pub mod messaging;

pub use memory::{InMemoryCommunityRepository, InMemoryMedicineRepository, InMemoryUserRepository};
pub use messaging::{PlainHasher, RecordingSender};

pub(crate) fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("{what} mutex poisoned"),
    }
}

/// A clock tests can move forward by hand.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: Duration) {
        let delta = match TimeDelta::from_std(delta) {
            Ok(delta) => delta,
            Err(error) => {
                panic!("failed to convert Duration to TimeDelta: {error}; delta={delta:?}")
            }
        };
        *lock(&self.0, "clock") += delta;
    }

    pub fn advance_days(&self, days: i64) {
        *lock(&self.0, "clock") += TimeDelta::days(days);
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *lock(&self.0, "clock")
    }
}

/// Returns at once and raises the stop flag after a set number of sleeps.
pub struct StopAfterSleeper {
    remaining: Mutex<u32>,
    intervals: Mutex<Vec<Duration>>,
    stop: watch::Sender<bool>,
}

impl StopAfterSleeper {
    /// Build a sleeper and the stop receiver to hand to the scan loop.
    pub fn new(sleeps: u32) -> (Self, watch::Receiver<bool>) {
        let (stop, receiver) = watch::channel(sleeps == 0);
        let sleeper = Self {
            remaining: Mutex::new(sleeps),
            intervals: Mutex::new(Vec::new()),
            stop,
        };
        (sleeper, receiver)
    }

    /// Durations requested so far.
    pub fn intervals(&self) -> Vec<Duration> {
        lock(&self.intervals, "intervals").clone()
    }
}

#[async_trait]
impl ScanSleeper for StopAfterSleeper {
    async fn sleep(&self, duration: Duration) {
        lock(&self.intervals, "intervals").push(duration);
        let mut remaining = lock(&self.remaining, "remaining");
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            self.stop.send_replace(true);
        }
    }
}
