//! Clock abstraction and the inter-attempt countdown.

use std::time::Duration;

use async_trait::async_trait;

/// Source of timed suspension.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production clock backed by `tokio::time`. Honors paused time in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Counts down whole seconds, checking a keep-going condition before each tick.
pub struct Countdown<'a> {
    clock: &'a dyn Clock,
    remaining: u64,
}

impl<'a> Countdown<'a> {
    pub fn new(clock: &'a dyn Clock, seconds: u64) -> Self {
        Self {
            clock,
            remaining: seconds,
        }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Run to zero, or until `keep_going` returns false.
    ///
    /// `on_tick` sees the remaining seconds before each one-second wait.
    /// Returns `true` if the countdown reached zero while `keep_going` still held.
    pub async fn run<K, T>(&mut self, keep_going: K, mut on_tick: T) -> bool
    where
        K: Fn() -> bool,
        T: FnMut(u64),
    {
        while self.remaining > 0 && keep_going() {
            on_tick(self.remaining);
            self.clock.sleep(Duration::from_secs(1)).await;
            self.remaining -= 1;
        }
        keep_going()
    }
}
