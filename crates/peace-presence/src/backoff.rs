//! Exponential reconnect backoff with jitter.

use std::time::Duration;

use rand::Rng;

/// Reconnect delay policy: `min(max, base * 2^attempt) + random(0, jitter)`.
///
/// The exponent is capped at `max_attempt`, so the delay saturates once the
/// cap is reached no matter how many further failures occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub base: Duration,
    pub max: Duration,
    pub jitter: Duration,
    pub max_attempt: u32,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(2000),
            max: Duration::from_millis(30_000),
            jitter: Duration::from_millis(1000),
            max_attempt: 10,
        }
    }
}

impl BackoffPolicy {
    /// Delay before jitter for the given attempt.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let exp = attempt.min(self.max_attempt).min(31);
        let factor = 1u32 << exp;
        self.base.saturating_mul(factor).min(self.max)
    }

    /// Full delay for the given attempt, jitter included.
    pub fn delay(&self, attempt: u32) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        let extra = if jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..jitter_ms)
        };
        self.base_delay(attempt) + Duration::from_millis(extra)
    }

    /// Attempt number to use after a scheduled reconnect fires.
    pub fn next_attempt(&self, attempt: u32) -> u32 {
        attempt.saturating_add(1).min(self.max_attempt)
    }
}
