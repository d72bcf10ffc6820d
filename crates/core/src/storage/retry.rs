//! Exponential-backoff retry for remote storage calls.

use std::future::Future;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use lessondrive_shared::config::RetrySettings;
use tracing::{error, warn};

use super::error::StorageError;

/// Retry policy for transient storage failures.
///
/// The operation closure is invoked once per attempt and must build its
/// request from scratch each time (clone the `Bytes`, never reuse a consumed
/// stream).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry. Doubles on every further retry.
    pub initial_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Default retries: 3.
    pub const DEFAULT_MAX_RETRIES: u32 = 3;
    /// Default initial delay: 1 second.
    pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1000);
    /// Default delay cap: 30 seconds.
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

    /// Create a policy with the default delay cap.
    #[must_use]
    pub const fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
            max_delay: Self::DEFAULT_MAX_DELAY,
        }
    }

    /// A policy that never retries.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Set the delay cap.
    #[must_use]
    pub const fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Delay before retrying after the failed attempt `attempt` (0-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Backoff schedule for this policy: doubling from `initial_delay`, capped
    /// at `max_delay`, at most `max_retries` retries, no jitter.
    #[must_use]
    pub fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.initial_delay)
            .with_max_delay(self.max_delay)
            .with_factor(2.0)
            .with_max_times(self.max_retries as usize)
    }

    /// Run `call` until it succeeds, fails permanently, or the retry budget is spent.
    ///
    /// # Errors
    ///
    /// Returns the permanent error as-is, or [`StorageError::RetryExhausted`]
    /// after `max_retries + 1` transient failures.
    pub async fn execute<T, F, Fut>(&self, operation: &str, call: F) -> Result<T, StorageError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StorageError>>,
    {
        let mut retries: u32 = 0;
        let result = call
            .retry(&self.backoff())
            .sleep(tokio::time::sleep)
            .when(StorageError::is_transient)
            .notify(|err: &StorageError, delay: Duration| {
                retries += 1;
                warn!(
                    operation,
                    attempt = retries,
                    max_attempts = self.max_retries + 1,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "Transient storage failure, retrying"
                );
            })
            .await;

        match result {
            Err(err) if err.is_transient() => {
                error!(
                    operation,
                    attempts = retries + 1,
                    error = %err,
                    "Storage call failed, retries exhausted"
                );
                Err(StorageError::RetryExhausted {
                    operation: operation.to_string(),
                    attempts: retries + 1,
                    last: Box::new(err),
                })
            }
            other => other,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_RETRIES, Self::DEFAULT_INITIAL_DELAY)
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self::new(
            settings.max_retries,
            Duration::from_millis(settings.initial_delay_ms),
        )
        .with_max_delay(Duration::from_millis(settings.max_delay_ms))
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Delays never exceed the cap and never shrink between attempts.
        #[test]
        fn prop_delay_monotonic_and_capped(
            initial_ms in 0u64..10_000,
            cap_ms in 0u64..120_000,
            attempt in 0u32..64,
        ) {
            let policy = RetryPolicy::new(64, Duration::from_millis(initial_ms))
                .with_max_delay(Duration::from_millis(cap_ms));

            let current = policy.delay_for(attempt);
            let next = policy.delay_for(attempt + 1);

            prop_assert!(current <= Duration::from_millis(cap_ms));
            prop_assert!(next >= current);
        }
    }
}
