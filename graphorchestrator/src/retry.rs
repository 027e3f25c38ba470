//! Retry policy applied by `execute_with_retry`: max attempts beyond the
//! first, an initial back-off delay, and a multiplier applied after each
//! failed attempt.

use std::time::Duration;

/// `(max_retries, initial_delay, backoff_multiplier)`.
///
/// A node's action is invoked at most `max_retries + 1` times per superstep
/// visit (P4). The per-node override, if set on a `Node`, takes precedence
/// over the executor's default policy.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    /// No retries: a single attempt, fail immediately.
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(0),
            backoff_multiplier: 1.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_delay: Duration, backoff_multiplier: f64) -> Self {
        Self {
            max_retries,
            initial_delay,
            backoff_multiplier,
        }
    }

    /// Delay to sleep before attempt `attempt` (0-based, counting retries
    /// only — the first attempt has no preceding delay).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return self.initial_delay;
        }
        let scaled = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(attempt as i32);
        Duration::from_secs_f64(scaled.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_has_no_retries() {
        let p = RetryPolicy::default();
        assert_eq!(p.max_retries, 0);
    }

    #[test]
    fn delay_grows_by_backoff_multiplier() {
        let p = RetryPolicy::new(3, Duration::from_millis(100), 2.0);
        assert_eq!(p.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(p.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(p.delay_for_attempt(2), Duration::from_millis(400));
    }
}
