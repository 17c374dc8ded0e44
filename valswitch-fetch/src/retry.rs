//! Retry timing for rank API requests.

use std::time::Duration;

use rand::Rng;

/// Timing policy for a sequence of request attempts.
///
/// Every attempt is preceded by a random jitter. Empty results back off
/// exponentially, and a rate-limited answer triggers a fixed cooldown.
#[derive(Debug, Clone)]
pub struct RetryStrategy {
    /// Maximum number of attempts.
    pub max_attempts: u32,
    /// Delay after the first empty attempt; doubled for each later one.
    pub base_delay: Duration,
    /// Whether to use exponential backoff.
    pub exponential_backoff: bool,
    /// Upper bound for a single backoff delay.
    pub max_delay: Duration,
    /// Fixed wait after a rate-limited response.
    pub rate_limit_cooldown: Duration,
    /// Lower bound of the pre-request jitter.
    pub jitter_min: Duration,
    /// Upper bound (exclusive) of the pre-request jitter.
    pub jitter_max: Duration,
}

impl RetryStrategy {
    /// Creates a strategy with the default rank API timings.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::from_secs(2),
            exponential_backoff: true,
            max_delay: Duration::from_secs(60),
            rate_limit_cooldown: Duration::from_secs(60),
            jitter_min: Duration::from_millis(2000),
            jitter_max: Duration::from_millis(3000),
        }
    }

    /// No waiting at all. Used in tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            exponential_backoff: false,
            max_delay: Duration::ZERO,
            rate_limit_cooldown: Duration::ZERO,
            jitter_min: Duration::ZERO,
            jitter_max: Duration::ZERO,
        }
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self::new(1)
    }

    /// Sets the maximum number of attempts (at least one).
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Sets the base delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Enables or disables exponential backoff.
    pub fn with_exponential_backoff(mut self, enabled: bool) -> Self {
        self.exponential_backoff = enabled;
        self
    }

    /// Sets the rate-limit cooldown.
    pub fn with_rate_limit_cooldown(mut self, cooldown: Duration) -> Self {
        self.rate_limit_cooldown = cooldown;
        self
    }

    /// Sets the jitter window.
    pub fn with_jitter(mut self, min: Duration, max: Duration) -> Self {
        self.jitter_min = min;
        self.jitter_max = max.max(min);
        self
    }

    /// Calculates the backoff after the given (1-based) empty attempt.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = if self.exponential_backoff {
            self.base_delay
                .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
        } else {
            self.base_delay
        };

        delay.min(self.max_delay)
    }

    /// Picks a random pre-request delay inside the jitter window.
    pub fn jitter(&self) -> Duration {
        if self.jitter_max <= self.jitter_min {
            return self.jitter_min;
        }
        rand::thread_rng().gen_range(self.jitter_min..self.jitter_max)
    }

    /// Returns true if another attempt follows `attempt`.
    pub fn has_attempts_after(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::new(3)
    }
}
