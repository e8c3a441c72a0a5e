//! Backend API client
//!
//! [`BackendClient`] is the seam the orchestrator consumes;
//! [`HttpBackendClient`] is the production implementation over the vesting
//! backend's JSON endpoints.
//!
//! Retry discipline: only GETs are retried at this layer. Claim completion
//! is a POST whose retry loop belongs to the orchestrator, keyed on the fee
//! signature the backend deduplicates on. The status endpoint is single-shot
//! because the orchestrator already polls it under its own budget.

use crate::cache::ResponseCache;
use crate::config::ClientConfig;
use crate::error::BackendError;
use crate::retry::retry_with_backoff_if;
use crate::stats::ClientStats;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use vestflow_types::wire::{
    ClaimInitiateRequest, ClaimInitiateResponse, ClaimStatusResponse, CompleteClaimRequest,
    CompleteClaimResponse, ErrorBody, HistoryResponse, PoolBreakdownWire,
};
use vestflow_types::{
    ClaimCompletionResult, ClaimHistoryItem, ClaimQuote, ClaimStatus, PoolBreakdown, PoolId,
    TxSignature, WalletAddress,
};

/// Vesting backend operations the claim flow consumes
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Request a claim quote and unsigned fee transaction
    ///
    /// Side-effect free on the backend until a fee payment is confirmed, so
    /// calling it repeatedly is safe.
    async fn initiate_claim(
        &self,
        wallet: &WalletAddress,
        amount: Option<f64>,
        pool_id: Option<PoolId>,
    ) -> Result<ClaimQuote, BackendError>;

    /// Complete a claim after the fee payment confirmed
    ///
    /// Idempotent per `fee_signature`: the backend must not transfer tokens
    /// twice for one fee payment, because callers retry this.
    async fn complete_claim(
        &self,
        wallet: &WalletAddress,
        fee_signature: &TxSignature,
        pool_breakdown: &[PoolBreakdown],
    ) -> Result<ClaimCompletionResult, BackendError>;

    /// Status of the backend-submitted token transfer
    async fn claim_status(
        &self,
        token_signature: &TxSignature,
    ) -> Result<ClaimStatus, BackendError>;

    /// Fulfilled claims for a wallet; an empty history is not an error
    async fn claim_history(
        &self,
        wallet: &WalletAddress,
    ) -> Result<Vec<ClaimHistoryItem>, BackendError>;
}

/// HTTP implementation of [`BackendClient`]
#[derive(Debug)]
pub struct HttpBackendClient {
    http: reqwest::Client,
    config: ClientConfig,
    cache: ResponseCache,
    stats: ClientStats,
}

impl HttpBackendClient {
    /// Create a client for the configured backend
    ///
    /// # Errors
    /// Propagates TLS/connector setup failures from the HTTP stack.
    pub fn new(config: ClientConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        let cache = ResponseCache::new(config.cache_capacity, config.cache_ttl);
        Ok(Self {
            http,
            config,
            cache,
            stats: ClientStats::new(),
        })
    }

    /// Request statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> &ClientStats {
        &self.stats
    }

    /// Drop cached responses for a wallet (wallet switch, post-claim refresh)
    pub async fn invalidate_wallet(&self, wallet: &WalletAddress) {
        self.cache.invalidate_wallet(wallet.as_str()).await;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    async fn decode_response<R: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<R, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });

        Err(BackendError::Http {
            status: status.as_u16(),
            message,
        })
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, BackendError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        self.stats.record_request();
        tracing::debug!(path, "POST");
        let response = self.http.post(self.url(path)).json(body).send().await?;
        let result = Self::decode_response(response).await;
        if result.is_err() {
            self.stats.record_failure();
        }
        result
    }

    /// GET with transport-level retry for transient failures
    async fn get_with_retry<R: DeserializeOwned>(&self, path: &str) -> Result<R, BackendError> {
        let calls = AtomicU64::new(0);
        let result = retry_with_backoff_if(
            &self.config.transport_retry,
            || {
                calls.fetch_add(1, Ordering::Relaxed);
                async {
                    self.stats.record_request();
                    tracing::debug!(path, "GET");
                    let response = self.http.get(self.url(path)).send().await?;
                    Self::decode_response(response).await
                }
            },
            BackendError::is_retryable,
        )
        .await;

        self.stats
            .record_retries(calls.load(Ordering::Relaxed).saturating_sub(1));

        result.map_err(|exhausted| {
            self.stats.record_failure();
            exhausted.last_error
        })
    }

    async fn get_once<R: DeserializeOwned>(&self, path: &str) -> Result<R, BackendError> {
        self.stats.record_request();
        tracing::debug!(path, "GET");
        let response = self.http.get(self.url(path)).send().await?;
        let result = Self::decode_response(response).await;
        if result.is_err() {
            self.stats.record_failure();
        }
        result
    }
}

#[async_trait]
impl BackendClient for HttpBackendClient {
    async fn initiate_claim(
        &self,
        wallet: &WalletAddress,
        amount: Option<f64>,
        pool_id: Option<PoolId>,
    ) -> Result<ClaimQuote, BackendError> {
        let request = ClaimInitiateRequest {
            user_wallet: wallet.clone(),
            amount_to_claim: amount,
            pool_id,
        };
        let response: ClaimInitiateResponse = self.post("/user/vesting/claim", &request).await?;
        Ok(ClaimQuote::try_from(response)?)
    }

    async fn complete_claim(
        &self,
        wallet: &WalletAddress,
        fee_signature: &TxSignature,
        pool_breakdown: &[PoolBreakdown],
    ) -> Result<ClaimCompletionResult, BackendError> {
        let request = CompleteClaimRequest {
            user_wallet: wallet.clone(),
            fee_signature: fee_signature.clone(),
            pool_breakdown: pool_breakdown
                .iter()
                .cloned()
                .map(PoolBreakdownWire::from)
                .collect(),
        };
        let response: CompleteClaimResponse =
            self.post("/user/vesting/complete-claim", &request).await?;
        Ok(ClaimCompletionResult::try_from(response)?)
    }

    async fn claim_status(
        &self,
        token_signature: &TxSignature,
    ) -> Result<ClaimStatus, BackendError> {
        let path = format!("/user/vesting/claim-status/{token_signature}");
        let response: ClaimStatusResponse = self.get_once(&path).await?;
        Ok(ClaimStatus::try_from(response)?)
    }

    async fn claim_history(
        &self,
        wallet: &WalletAddress,
    ) -> Result<Vec<ClaimHistoryItem>, BackendError> {
        let path = format!("/user/vesting/history?wallet={wallet}");
        let key = ResponseCache::key(wallet.as_str(), &path);

        if let Some(cached) = self.cache.get::<Vec<ClaimHistoryItem>>(&key).await {
            self.stats.record_cache_hit();
            return Ok(cached);
        }
        self.stats.record_cache_miss();

        match self.get_with_retry::<HistoryResponse>(&path).await {
            Ok(response) => {
                self.cache.insert(key, &response.data).await;
                Ok(response.data)
            }
            // A wallet with no claims yet 404s; that is an empty history
            Err(BackendError::Http { status: 404, .. }) => Ok(Vec::new()),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client() -> HttpBackendClient {
        HttpBackendClient::new(
            ClientConfig::new("https://backend.example.com/api/")
                .with_request_timeout(Duration::from_secs(5)),
        )
        .unwrap()
    }

    #[test]
    fn url_joins_without_double_slash() {
        let c = client();
        assert_eq!(
            c.url("/user/vesting/claim"),
            "https://backend.example.com/api/user/vesting/claim"
        );
    }

    #[test]
    fn stats_start_zeroed() {
        let c = client();
        let snap = c.stats().snapshot();
        assert_eq!(snap.requests, 0);
        assert_eq!(snap.failures, 0);
    }
}
