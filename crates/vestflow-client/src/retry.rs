//! Retry and polling policies
//!
//! One implementation of bounded retry with exponential backoff, shared by
//! the HTTP transport (retryable GETs) and the orchestrator (claim
//! completion). Polling is a separate shape: fixed interval, bounded count,
//! stop on a verdict.

use std::future::Future;
use std::time::Duration;

/// Bounded retry with exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub initial_delay: Duration,
    /// Backoff cap
    pub max_delay: Duration,
    /// Delay multiplier per attempt
    pub multiplier: u32,
}

impl RetryPolicy {
    /// Create a policy
    #[inline]
    #[must_use]
    pub const fn new(
        max_attempts: u32,
        initial_delay: Duration,
        max_delay: Duration,
        multiplier: u32,
    ) -> Self {
        Self {
            max_attempts,
            initial_delay,
            max_delay,
            multiplier,
        }
    }

    /// Policy for claim completion: 3 attempts, 2s doubling, capped at 10s
    #[inline]
    #[must_use]
    pub const fn completion_default() -> Self {
        Self::new(3, Duration::from_secs(2), Duration::from_secs(10), 2)
    }

    /// Policy for transport-level GET retry: 3 attempts, 1s doubling, 10s cap
    #[inline]
    #[must_use]
    pub const fn transport_default() -> Self {
        Self::new(3, Duration::from_secs(1), Duration::from_secs(10), 2)
    }

    /// Delay to wait after the given 1-based failed attempt
    ///
    /// Pure so tests can check the curve without sleeping.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.saturating_pow(attempt.saturating_sub(1));
        let delay = self.initial_delay.saturating_mul(factor);
        delay.min(self.max_delay)
    }
}

/// All attempts failed
#[derive(Debug, thiserror::Error)]
#[error("gave up after {attempts} attempts: {last_error}")]
pub struct RetryExhausted<E: std::error::Error> {
    /// Attempts made
    pub attempts: u32,
    /// The final attempt's error
    pub last_error: E,
}

/// Run `op` under `policy`, retrying failures that satisfy `should_retry`
///
/// A failure that `should_retry` declines is returned immediately with the
/// attempt count at that point.
pub async fn retry_with_backoff_if<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    mut op: F,
    should_retry: P,
) -> Result<T, RetryExhausted<E>>
where
    E: std::error::Error,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_attempts && should_retry(&err) => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    ?delay,
                    error = %err,
                    "attempt failed, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                return Err(RetryExhausted {
                    attempts: attempt,
                    last_error: err,
                })
            }
        }
    }
}

/// Run `op` under `policy`, retrying every failure
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: &RetryPolicy,
    op: F,
) -> Result<T, RetryExhausted<E>>
where
    E: std::error::Error,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    retry_with_backoff_if(policy, op, |_| true).await
}

/// Fixed-interval bounded polling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Pause between polls
    pub interval: Duration,
    /// Maximum polls before giving up
    pub max_polls: u32,
}

impl PollPolicy {
    /// Create a policy
    #[inline]
    #[must_use]
    pub const fn new(interval: Duration, max_polls: u32) -> Self {
        Self {
            interval,
            max_polls,
        }
    }

    /// Policy for claim status: every 3s, at most 10 polls
    #[inline]
    #[must_use]
    pub const fn status_default() -> Self {
        Self::new(Duration::from_secs(3), 10)
    }
}

/// Result of a bounded poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// `op` produced a verdict
    Settled(T),
    /// Budget exhausted without a verdict
    Exhausted,
}

/// Poll `op` until it yields `Some`, the poll budget runs out, or never
///
/// The first poll happens immediately; subsequent polls are spaced by the
/// policy interval. Inconclusive polls return `None`.
pub async fn poll_until<T, F, Fut>(policy: &PollPolicy, mut op: F) -> PollOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    for poll in 1..=policy.max_polls {
        if let Some(verdict) = op().await {
            return PollOutcome::Settled(verdict);
        }
        if poll < policy.max_polls {
            tokio::time::sleep(policy.interval).await;
        }
    }
    PollOutcome::Exhausted
}
