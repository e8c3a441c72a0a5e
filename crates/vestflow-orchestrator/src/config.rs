//! Orchestrator configuration

use std::time::Duration;
use vestflow_client::{Commitment, PollPolicy, RetryPolicy};

/// Timeouts and retry budgets for the claim saga
///
/// Every bound here is caller-visible as a distinct error kind, so tests
/// tune them down instead of mocking time.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Hard cap on waiting for the fee payment to confirm
    pub fee_confirmation_timeout: Duration,
    /// Commitment level the fee payment must reach
    pub commitment: Commitment,
    /// Retry budget for the completion call
    pub completion_retry: RetryPolicy,
    /// Poll budget for the claim status endpoint
    pub status_poll: PollPolicy,
}

impl OrchestratorConfig {
    /// Production defaults: 60s fee confirmation, 3x2s-backoff completion,
    /// 10x3s status polling
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With fee confirmation timeout
    #[inline]
    #[must_use]
    pub fn with_fee_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.fee_confirmation_timeout = timeout;
        self
    }

    /// With commitment level
    #[inline]
    #[must_use]
    pub fn with_commitment(mut self, commitment: Commitment) -> Self {
        self.commitment = commitment;
        self
    }

    /// With completion retry policy
    #[inline]
    #[must_use]
    pub fn with_completion_retry(mut self, policy: RetryPolicy) -> Self {
        self.completion_retry = policy;
        self
    }

    /// With status poll policy
    #[inline]
    #[must_use]
    pub fn with_status_poll(mut self, policy: PollPolicy) -> Self {
        self.status_poll = policy;
        self
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            fee_confirmation_timeout: Duration::from_secs(60),
            commitment: Commitment::Confirmed,
            completion_retry: RetryPolicy::completion_default(),
            status_poll: PollPolicy::status_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contract() {
        let config = OrchestratorConfig::new();
        assert_eq!(config.fee_confirmation_timeout, Duration::from_secs(60));
        assert_eq!(config.completion_retry.max_attempts, 3);
        assert_eq!(config.completion_retry.initial_delay, Duration::from_secs(2));
        assert_eq!(config.completion_retry.max_delay, Duration::from_secs(10));
        assert_eq!(config.status_poll.max_polls, 10);
        assert_eq!(config.status_poll.interval, Duration::from_secs(3));
    }
}
