//! Wall clock and sleeping, injectable for tests
//!
//! Signing timestamps, rate-limit reset times and cache ages all read the
//! same [`Clock`], and rate-limit pauses go through [`Clock::sleep`].

use async_trait::async_trait;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of unix time and sleeps
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current unix time in seconds
    fn unix_time(&self) -> f64;

    /// Pause the current task
    async fn sleep(&self, duration: Duration);
}

/// System clock backed by `SystemTime` and `tokio::time::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn unix_time(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockClock;

#[cfg(any(test, feature = "test-utils"))]
mod mock {
    use super::*;
    use parking_lot::Mutex;

    /// Manually driven clock
    ///
    /// `sleep` returns immediately, records the requested duration and
    /// advances the clock by it.
    #[derive(Debug, Default)]
    pub struct MockClock {
        now: Mutex<f64>,
        sleeps: Mutex<Vec<Duration>>,
    }

    impl MockClock {
        /// Create a clock frozen at `now`
        pub fn new(now: f64) -> Self {
            Self {
                now: Mutex::new(now),
                sleeps: Mutex::new(Vec::new()),
            }
        }

        /// Jump to an absolute time
        pub fn set(&self, now: f64) {
            *self.now.lock() = now;
        }

        /// Move time forward
        pub fn advance(&self, by: Duration) {
            *self.now.lock() += by.as_secs_f64();
        }

        /// Every duration passed to `sleep`, in order
        pub fn sleeps(&self) -> Vec<Duration> {
            self.sleeps.lock().clone()
        }
    }

    #[async_trait]
    impl Clock for MockClock {
        fn unix_time(&self) -> f64 {
            *self.now.lock()
        }

        async fn sleep(&self, duration: Duration) {
            self.sleeps.lock().push(duration);
            self.advance(duration);
        }
    }
}
