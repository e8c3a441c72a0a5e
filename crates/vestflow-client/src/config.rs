//! Client configuration
//!
//! Builder-style configs for the backend HTTP client and the chain RPC
//! client. The RPC endpoint is always explicit or environment-provided;
//! there is deliberately no baked-in fallback URL.

use crate::chain::Commitment;
use crate::retry::RetryPolicy;
use std::time::Duration;

/// Environment variable naming the chain RPC endpoint
pub const RPC_URL_ENV: &str = "SOLANA_RPC_URL";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
}

/// Backend HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, e.g. `https://vesting.example.com/api`
    pub base_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// TTL for cached GET responses
    pub cache_ttl: Duration,
    /// Maximum cached responses
    pub cache_capacity: u64,
    /// Transport-level retry for idempotent GETs
    pub transport_retry: RetryPolicy,
}

impl ClientConfig {
    /// Create a configuration for the given backend
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            request_timeout: Duration::from_secs(30),
            cache_ttl: Duration::from_secs(5 * 60),
            cache_capacity: 256,
            transport_retry: RetryPolicy::transport_default(),
        }
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// With cache TTL
    #[inline]
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// With transport retry policy
    #[inline]
    #[must_use]
    pub fn with_transport_retry(mut self, policy: RetryPolicy) -> Self {
        self.transport_retry = policy;
        self
    }
}

/// Chain RPC configuration
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// RPC endpoint URL
    pub url: String,
    /// Commitment level confirmations wait for
    pub commitment: Commitment,
    /// Pause between status queries while waiting
    pub poll_interval: Duration,
}

impl RpcConfig {
    /// Create a configuration for the given endpoint
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            commitment: Commitment::Confirmed,
            poll_interval: Duration::from_secs(2),
        }
    }

    /// Read the endpoint from `SOLANA_RPC_URL`
    ///
    /// # Errors
    /// [`ConfigError::MissingEnv`] when the variable is unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(RPC_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Ok(Self::new(url)),
            _ => Err(ConfigError::MissingEnv(RPC_URL_ENV)),
        }
    }

    /// With commitment level
    #[inline]
    #[must_use]
    pub fn with_commitment(mut self, commitment: Commitment) -> Self {
        self.commitment = commitment;
        self
    }

    /// With poll interval
    #[inline]
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_stripped() {
        let config = ClientConfig::new("https://backend.example.com/api/");
        assert_eq!(config.base_url, "https://backend.example.com/api");
    }

    #[test]
    fn client_defaults() {
        let config = ClientConfig::new("https://backend.example.com");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.transport_retry, RetryPolicy::transport_default());
    }

    #[test]
    fn rpc_builder() {
        let config = RpcConfig::new("https://rpc.example.com")
            .with_commitment(Commitment::Finalized)
            .with_poll_interval(Duration::from_millis(500));
        assert_eq!(config.commitment, Commitment::Finalized);
        assert_eq!(config.poll_interval, Duration::from_millis(500));
    }
}
