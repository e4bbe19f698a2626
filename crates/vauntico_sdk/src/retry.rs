//! Retry with exponential backoff.

use crate::error::Result;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// How many times a request is attempted and how long to wait in between.
///
/// After failed attempt `n` (0-indexed) the driver waits
/// `base_delay * 2^n`: 1s, 2s, 4s, ... with the default base delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero behaves like one.
    pub attempts: u32,
    /// Wait after the first failed attempt.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given attempt count and base delay.
    pub const fn new(attempts: u32, base_delay: Duration) -> Self {
        Self {
            attempts,
            base_delay,
        }
    }

    /// Attempts actually made; at least one.
    pub const fn max_attempts(&self) -> u32 {
        if self.attempts == 0 {
            1
        } else {
            self.attempts
        }
    }

    /// Wait after failed attempt `attempt` (0-indexed).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Drives `operation` until it succeeds, fails with a non-retryable
    /// error, or runs out of attempts.
    ///
    /// `operation` receives the 0-indexed attempt number. The returned error
    /// is the last attempt's; earlier failures are only logged.
    ///
    /// # Errors
    ///
    /// Returns the error of the final attempt.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = self.max_attempts();
        let mut attempt = 0;
        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt + 1 < attempts => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        attempt = attempt + 1,
                        attempts,
                        code = err.code(),
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Request failed, retrying: {}",
                        err
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
