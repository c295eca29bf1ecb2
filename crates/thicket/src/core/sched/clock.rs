use std::{thread, time::Instant};

/// The scheduler's source of time. The driver reads the current time and
/// blocks for sleeping tasks only through its clock.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Instant;

    /// Block until `deadline` has passed.
    fn sleep_until(&self, deadline: Instant);
}

/// Wall-clock time with real blocking sleeps.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep_until(&self, deadline: Instant) {
        let now = Instant::now();
        if deadline > now {
            thread::sleep(deadline - now);
        }
    }
}
