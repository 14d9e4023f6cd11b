//! Bounded retry loop with exponential backoff

use std::future::Future;
use std::time::Duration;

use tracing::debug;
use uplink_core::error::{ErrorKind, UplinkError};

use crate::RegistryResult;

/// Configuration for exponential backoff retry logic
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retry budget used when the caller does not supply one
    pub max_retries: u32,
    /// Initial delay before first retry
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Retry without waiting between attempts
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            multiplier: 1.0,
        }
    }

    fn next_delay(&self, delay: Duration) -> Duration {
        let next = Duration::from_millis((delay.as_millis() as f64 * self.multiplier) as u64);
        std::cmp::min(next, self.max_delay)
    }
}

/// Progress of one invocation through its retry budget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    pub attempts_remaining: u32,
    pub last_error: Option<ErrorKind>,
    attempts_made: u32,
}

impl RetryState {
    pub fn new(budget: u32) -> Self {
        Self {
            attempts_remaining: budget,
            last_error: None,
            attempts_made: 0,
        }
    }

    /// Number of attempts started so far
    pub fn attempts_made(&self) -> u32 {
        self.attempts_made
    }

    fn begin_attempt(&mut self) -> u32 {
        self.attempts_made += 1;
        self.attempts_made
    }

    /// Record a failure; returns true when another attempt is allowed
    fn record_failure(&mut self, error: &UplinkError) -> bool {
        self.last_error = Some(error.kind());

        if !error.is_retryable() || self.attempts_remaining == 0 {
            return false;
        }

        self.attempts_remaining -= 1;
        true
    }
}

/// Run `operation` until it succeeds, fails terminally, or the budget runs out.
///
/// `operation` receives the 1-based attempt number. Attempts are strictly
/// sequential; the last error is returned as-is once the budget is spent.
pub async fn with_retry<F, Fut, T>(
    config: &RetryConfig,
    state: &mut RetryState,
    mut operation: F,
) -> RegistryResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = RegistryResult<T>>,
{
    let mut delay = config.initial_delay;

    loop {
        let attempt = state.begin_attempt();

        let error = match operation(attempt).await {
            Ok(result) => return Ok(result),
            Err(error) => error,
        };

        if !state.record_failure(&error) {
            return Err(error);
        }

        debug!(
            attempt,
            remaining = state.attempts_remaining,
            error = %error,
            "retrying after {:?}",
            delay
        );

        // Wait before retry
        tokio::time::sleep(delay).await;
        delay = config.next_delay(delay);
    }
}
