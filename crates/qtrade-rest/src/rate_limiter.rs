//! Thread-safe rate limiter driven by qTrade's rate-limit headers
//!
//! Wraps a [`RateState`] behind a lock so one client can be shared across
//! async tasks. The lock is only held for the check or the update, never
//! while sleeping.

use std::time::Duration;

use parking_lot::Mutex;
use qtrade_types::{
    RateLimitResult, RateState, HEADER_LIMIT, HEADER_REMAINING, HEADER_RESET,
};
use tracing::{debug, instrument};

use crate::clock::Clock;
use crate::transport::HttpResponse;

/// Shared rate limiter for one client session
#[derive(Debug)]
pub struct RateLimiter {
    /// Last advertised state
    state: Mutex<RateState>,
    /// When false, `check` always allows (trusted internal callers)
    enabled: bool,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateState::default().soft_threshold, true)
    }
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(soft_threshold: f64, enabled: bool) -> Self {
        Self {
            state: Mutex::new(RateState::new(soft_threshold)),
            enabled,
        }
    }

    /// Create a rate limiter that never waits
    pub fn disabled() -> Self {
        Self::new(RateState::default().soft_threshold, false)
    }

    /// Whether rate limits are honored
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Snapshot of the current state
    pub fn state(&self) -> RateState {
        self.state.lock().clone()
    }

    /// Replace the current state
    pub fn set_state(&self, state: RateState) {
        *self.state.lock() = state;
    }

    /// Decide whether a request issued at `now` must wait
    pub fn check(&self, now: f64) -> RateLimitResult {
        if !self.enabled {
            return RateLimitResult::Allowed;
        }
        self.state.lock().check(now)
    }

    /// Sleep as long as the current state requires
    ///
    /// Returns the duration slept.
    #[instrument(skip(self, clock), level = "debug")]
    pub async fn throttle(&self, clock: &dyn Clock) -> Duration {
        match self.check(clock.unix_time()) {
            RateLimitResult::Limited { wait, reason } if !wait.is_zero() => {
                debug!(?reason, wait_secs = wait.as_secs_f64(), "Rate limited, sleeping");
                clock.sleep(wait).await;
                wait
            }
            _ => Duration::ZERO,
        }
    }

    /// Overwrite the state from a response's headers
    ///
    /// Applied to every response, including errors and 429s.
    pub fn update_from_response(&self, now: f64, response: &HttpResponse) {
        let mut state = self.state.lock();
        state.update(
            now,
            response.header(HEADER_RESET),
            response.header(HEADER_LIMIT),
            response.header(HEADER_REMAINING),
        );
    }
}
