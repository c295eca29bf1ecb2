//! A virtual clock for deterministic scheduler tests.
use std::{
    cell::Cell,
    rc::Rc,
    time::{Duration, Instant},
};

use crate::sched::Clock;

/// A clock whose blocking wait advances virtual time instead of sleeping.
/// Clones share the same timeline.
#[derive(Debug, Clone)]
pub struct ManualClock {
    /// Fixed origin.
    start: Instant,
    /// Virtual time elapsed since `start`.
    offset: Rc<Cell<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    /// A clock starting now.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    /// Virtual time elapsed since construction.
    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }

    /// Move time forward.
    pub fn advance(&self, d: Duration) {
        self.offset.set(self.offset.get() + d);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + self.offset.get()
    }

    fn sleep_until(&self, deadline: Instant) {
        let target = deadline.saturating_duration_since(self.start);
        if target > self.offset.get() {
            self.offset.set(target);
        }
    }
}
