//! Retry with exponential backoff for transient queue failures.
//!
//! The contract is fixed by the gating core: up to 3 attempts, delays of
//! 25 ms then 50 ms, capped at 250 ms. [`retry`] also observes
//! cancellation during the sleep between attempts, surfacing
//! [`crate::error::DispatchError::RetryCanceled`] instead of completing
//! the delay.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::DispatchError;

/// Configuration for the queue-retry backoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Ceiling on the exponential growth.
    pub max_delay: Duration,
    /// Exponential base.
    pub exponential_base: f64,
}

impl RetryConfig {
    /// The contract the gating core's retry loop uses for transient
    /// queue failures: 3 attempts, 25 ms then 50 ms, capped at 250 ms.
    #[must_use]
    pub const fn queue() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(25),
            max_delay: Duration::from_millis(250),
            exponential_base: 2.0,
        }
    }

    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_wrap,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let base_delay_ms = self.initial_delay.as_millis() as f64 * self.exponential_base.powi(exponent);
        let capped_delay_ms = base_delay_ms.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped_delay_ms.max(0.0) as u64)
    }

    fn should_retry(&self, current_attempt: u32) -> bool {
        current_attempt + 1 < self.max_attempts
    }
}

/// Case-insensitive substring markers the queue-retry loop treats as
/// transient, in addition to the shared transient-error set (rate
/// limits, 5xx, network resets, timeouts) a caller's `should_retry`
/// predicate may also recognize.
pub const TRANSIENT_MARKERS: &[&str] = &[
    "temporary failure",
    "queue full",
    "resource busy",
    "database is locked",
    "deadlock",
    "unexpected eof",
    "eof",
    "try again",
];

/// Whether `message` matches one of the queue-retry transient markers.
#[must_use]
pub fn is_transient_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    TRANSIENT_MARKERS.iter().any(|m| lower.contains(m))
}

/// Execute `operation` with the queue-retry contract, honoring
/// cancellation of `token` during the sleep between attempts.
///
/// `should_retry` receives the error and decides whether to retry;
/// return `false` to abort immediately on a non-transient error.
pub async fn retry<T, E, Fut, F, P>(
    config: &RetryConfig,
    token: &CancellationToken,
    operation_name: &str,
    mut operation: F,
    should_retry: P,
) -> Result<T, DispatchError>
where
    F: FnMut(u32) -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if !config.should_retry(attempt) || !should_retry(&error) {
                    return Err(DispatchError::RetriesExhausted {
                        operation: operation_name.to_string(),
                        attempts: attempt + 1,
                        message: error.to_string(),
                    });
                }

                attempt += 1;
                let delay = config.delay_for_attempt(attempt);
                tokio::select! {
                    () = tokio::time::sleep(delay) => {}
                    () = token.cancelled() => {
                        return Err(DispatchError::RetryCanceled {
                            operation: operation_name.to_string(),
                        });
                    }
                }
            }
        }
    }
}
