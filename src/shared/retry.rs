//! Retry with exponential backoff
//!
//! Used at the store boundary only: connecting to the database and
//! read queries that failed with a transient error.

use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first one).
    pub max_attempts: u32,
    /// Initial delay between retries.
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_multiplier: f64,
    /// Maximum delay between retries (cap).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(200),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryConfig {
    /// Short schedule for read queries issued while serving a request.
    pub fn for_reads() -> Self {
        Self {
            max_attempts: 2,
            initial_delay: Duration::from_millis(50),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_millis(200),
        }
    }
}

/// Execute an async operation with exponential backoff retry.
///
/// The `should_retry` closure determines whether a given error is transient
/// (and therefore retryable) or permanent (bail immediately).
pub async fn retry_with_backoff<F, Fut, T, E>(
    config: RetryConfig,
    mut operation: F,
    should_retry: impl Fn(&E) -> bool,
    operation_name: &str,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut delay = config.initial_delay;
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    info!(operation = operation_name, attempt, "Succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => {
                if attempt >= config.max_attempts || !should_retry(&err) {
                    warn!(
                        operation = operation_name,
                        attempt,
                        max_attempts = config.max_attempts,
                        error = %err,
                        "Operation failed permanently"
                    );
                    return Err(err);
                }

                warn!(
                    operation = operation_name,
                    attempt,
                    max_attempts = config.max_attempts,
                    error = %err,
                    retry_in_ms = delay.as_millis() as u64,
                    "Transient failure, retrying"
                );

                tokio::time::sleep(delay).await;

                delay = Duration::from_secs_f64(
                    (delay.as_secs_f64() * config.backoff_multiplier)
                        .min(config.max_delay.as_secs_f64()),
                );
                attempt += 1;
            }
        }
    }
}
