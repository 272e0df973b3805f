//! Back-pressure between deletes

use std::time::Duration;

/// Pacing constants applied after every executed delete.
///
/// The pause is `base + elapsed * factor`, so a database that slows down
/// gets proportionally more room between blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pacing {
    pub base: Duration,
    pub factor: f64,
    /// Latency reported for a delete that was not executed (dry run).
    pub dry_run_latency: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(10),
            factor: 20.0,
            dry_run_latency: Duration::from_millis(50),
        }
    }
}

impl Pacing {
    /// Pause to take after a delete that took `elapsed`.
    pub fn delay_for(&self, elapsed: Duration) -> Duration {
        self.base + elapsed.mul_f64(self.factor)
    }
}

/// Blocking sleep, abstracted so runs can be replayed without waiting.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Records requested pauses instead of sleeping.
#[derive(Debug, Default, Clone)]
pub struct RecordingSleeper {
    pub slept: Vec<Duration>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> Duration {
        self.slept.iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&mut self, duration: Duration) {
        self.slept.push(duration);
    }
}
