use std::time::Duration;

use async_trait::async_trait;

/// How many times a signing request is tried and how long to wait in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay after the first failure; later delays grow linearly.
    pub base_delay: Duration,
    /// Timeout applied to each individual attempt.
    pub attempt_timeout: Duration,
    /// Whether to wait out a delay after the last failed attempt as well.
    pub sleep_after_final: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            attempt_timeout: Duration::from_secs(15),
            sleep_after_final: false,
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    /// Attempt budget, never below one.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Upper bound on a single `sign` call when every attempt times out.
    pub fn worst_case_duration(&self) -> Duration {
        let attempts = self.attempts();
        let sleeps = if self.sleep_after_final {
            attempts
        } else {
            attempts - 1
        };
        let delays: Duration = (1..=sleeps).map(|n| self.delay_for(n)).sum();
        self.attempt_timeout * attempts + delays
    }
}

/// Source of backoff delays. Swapped out in tests to avoid real waiting.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer. Dropping the future cancels the wait.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
