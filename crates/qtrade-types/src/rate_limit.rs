//! Client-side rate limiting for the qTrade API
//!
//! qTrade advertises its request budget on every response through three
//! headers: seconds until the budget resets, the budget size, and how much of
//! it is left. [`RateState`] keeps the last advertised values and decides how
//! long the client should pause before its next request.
//!
//! Two regimes apply:
//! - **Hard limit**: with nothing left, wait until the reset time.
//! - **Soft limit**: once the remaining budget drops to
//!   `floor(limit * (1 - soft_threshold))`, spread what is left evenly over the
//!   time until reset instead of bursting and then stalling.

use std::time::Duration;

/// Header carrying the seconds until the budget resets
pub const HEADER_RESET: &str = "x-ratelimit-reset";
/// Header carrying the budget size
pub const HEADER_LIMIT: &str = "x-ratelimit-limit";
/// Header carrying the remaining budget
pub const HEADER_REMAINING: &str = "x-ratelimit-remaining";

/// Fallback when the reset header is missing or unparsable
pub const DEFAULT_RESET_SECS: i64 = 0;
/// Fallback when the limit header is missing or unparsable
pub const DEFAULT_LIMIT: i64 = 100;
/// Fallback when the remaining header is missing or unparsable
pub const DEFAULT_REMAINING: i64 = 99;
/// Fraction of the budget consumed before pacing starts
pub const DEFAULT_SOFT_THRESHOLD: f64 = 0.5;

/// Last advertised rate limit state
#[derive(Debug, Clone, PartialEq)]
pub struct RateState {
    /// Requests left in the current window (may be negative)
    pub remaining: i64,
    /// Size of the window budget
    pub limit: i64,
    /// Unix time (seconds) at which the budget resets
    pub reset_at: f64,
    /// Fraction of the budget consumed before pacing starts
    pub soft_threshold: f64,
}

impl Default for RateState {
    fn default() -> Self {
        Self::new(DEFAULT_SOFT_THRESHOLD)
    }
}

impl RateState {
    /// Create a fresh state with the given soft threshold
    pub fn new(soft_threshold: f64) -> Self {
        Self {
            remaining: DEFAULT_REMAINING,
            limit: DEFAULT_LIMIT,
            reset_at: 0.0,
            soft_threshold,
        }
    }

    /// Remaining budget at or below which pacing starts
    pub fn soft_limit(&self) -> i64 {
        (self.limit as f64 * (1.0 - self.soft_threshold)).floor() as i64
    }

    /// Decide whether the next request must wait, given the current unix time
    pub fn check(&self, now: f64) -> RateLimitResult {
        let until_reset = self.reset_at - now;

        if self.remaining <= 0 {
            return RateLimitResult::Limited {
                wait: secs(until_reset),
                reason: LimitReason::Exhausted,
            };
        }

        if self.remaining <= self.soft_limit() {
            return RateLimitResult::Limited {
                wait: secs(until_reset / self.remaining as f64),
                reason: LimitReason::SoftLimit,
            };
        }

        RateLimitResult::Allowed
    }

    /// Overwrite the state from raw response header values
    ///
    /// Missing or unparsable values fall back to the documented defaults.
    pub fn update(
        &mut self,
        now: f64,
        reset_secs: Option<&str>,
        limit: Option<&str>,
        remaining: Option<&str>,
    ) {
        self.reset_at = now + parse_or(reset_secs, DEFAULT_RESET_SECS) as f64;
        self.limit = parse_or(limit, DEFAULT_LIMIT);
        self.remaining = parse_or(remaining, DEFAULT_REMAINING);
    }
}

fn parse_or(value: Option<&str>, default: i64) -> i64 {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn secs(value: f64) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::from_secs_f64(value)
    } else {
        Duration::ZERO
    }
}

/// Why a request was held back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitReason {
    /// Budget is used up, waiting for the full reset
    Exhausted,
    /// Soft limit crossed, pacing the remaining budget
    SoftLimit,
}

/// Result of a rate limit check
#[derive(Debug, Clone, PartialEq)]
pub enum RateLimitResult {
    /// Request is allowed
    Allowed,
    /// Request is rate limited, wait the specified duration
    Limited { wait: Duration, reason: LimitReason },
}

impl RateLimitResult {
    /// Check if the request is allowed
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Get the wait duration if rate limited
    pub fn wait_duration(&self) -> Option<Duration> {
        match self {
            Self::Allowed => None,
            Self::Limited { wait, .. } => Some(*wait),
        }
    }
}
