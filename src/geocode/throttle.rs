//! Request pacing.
//!
//! The geocoding provider allows at most one request per second. The
//! [`RateLimiter`] pauses for one full interval after every request, so a
//! batch of `n` requests never takes less than `n` intervals.

use std::time::{Duration, Instant};

/// Source of time for the limiter. Swapped out in tests.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Fixed-rate limiter with a single permit.
pub struct RateLimiter<C> {
    clock: C,
    interval: Duration,
    pauses: u64,
}

impl<C: Clock> RateLimiter<C> {
    pub fn new(clock: C, interval: Duration) -> Self {
        Self {
            clock,
            interval,
            pauses: 0,
        }
    }

    /// Block until the next request is permitted. Call once after every
    /// request, whether it succeeded or not.
    pub fn pause(&mut self) {
        if self.interval.is_zero() {
            return;
        }
        log::trace!("Waiting {:?} before next request", self.interval);
        self.clock.sleep(self.interval);
        self.pauses += 1;
    }

    /// Number of pauses taken so far.
    pub fn pauses(&self) -> u64 {
        self.pauses
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Virtual clock: `sleep` advances time instantly and records the call.
    #[derive(Clone)]
    pub struct FakeClock {
        start: Instant,
        state: Rc<RefCell<FakeState>>,
    }

    #[derive(Default)]
    struct FakeState {
        elapsed: Duration,
        sleeps: Vec<Duration>,
    }

    impl FakeClock {
        pub fn new() -> Self {
            Self {
                start: Instant::now(),
                state: Rc::default(),
            }
        }

        pub fn elapsed(&self) -> Duration {
            self.state.borrow().elapsed
        }

        pub fn sleeps(&self) -> Vec<Duration> {
            self.state.borrow().sleeps.clone()
        }

        /// Simulate time spent outside the limiter, e.g. network latency.
        pub fn advance(&self, by: Duration) {
            self.state.borrow_mut().elapsed += by;
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> Instant {
            self.start + self.state.borrow().elapsed
        }

        fn sleep(&self, duration: Duration) {
            let mut state = self.state.borrow_mut();
            state.elapsed += duration;
            state.sleeps.push(duration);
        }
    }
}
