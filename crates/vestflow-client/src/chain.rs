//! Chain confirmation seam
//!
//! Confirmation is the only thing this client asks of the chain directly;
//! the token transfer itself is submitted server-side.

use crate::config::RpcConfig;
use crate::error::ChainError;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::Instant;
use vestflow_types::TxSignature;

/// Confirmation commitment levels, weakest to strongest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Commitment {
    /// Seen by the node
    Processed,
    /// Voted on by a supermajority
    Confirmed,
    /// Rooted
    Finalized,
}

impl Commitment {
    /// Wire representation used by the RPC API
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::Confirmed => "confirmed",
            Self::Finalized => "finalized",
        }
    }

    fn from_status(status: &str) -> Option<Self> {
        match status {
            "processed" => Some(Self::Processed),
            "confirmed" => Some(Self::Confirmed),
            "finalized" => Some(Self::Finalized),
            _ => None,
        }
    }
}

/// Transaction confirmation capability
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Wait until `signature` reaches `commitment` or `timeout` elapses
    ///
    /// # Errors
    /// - [`ChainError::ConfirmationTimeout`] when the budget runs out with
    ///   the transaction still unconfirmed (state unknown, not failed)
    /// - [`ChainError::TransactionFailed`] when the chain reports an error
    ///   for the transaction
    async fn confirm_transaction(
        &self,
        signature: &TxSignature,
        commitment: Commitment,
        timeout: Duration,
    ) -> Result<(), ChainError>;
}

/// JSON-RPC implementation polling `getSignatureStatuses`
#[derive(Debug)]
pub struct RpcChainClient {
    http: reqwest::Client,
    config: RpcConfig,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<RpcResult>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResult {
    value: Vec<Option<SignatureStatus>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignatureStatus {
    #[serde(default)]
    confirmation_status: Option<String>,
    #[serde(default)]
    err: Option<serde_json::Value>,
}

impl RpcChainClient {
    /// Create a client against the configured RPC endpoint
    #[must_use]
    pub fn new(config: RpcConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn signature_status(
        &self,
        signature: &TxSignature,
    ) -> Result<Option<SignatureStatus>, ChainError> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getSignatureStatuses",
            "params": [[signature.as_str()], { "searchTransactionHistory": true }],
        });

        let response = self
            .http
            .post(&self.config.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;

        let parsed: RpcResponse = response
            .json()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;

        if let Some(err) = parsed.error {
            return Err(ChainError::Rpc(err.message));
        }

        let mut value = parsed
            .result
            .ok_or_else(|| ChainError::Rpc("missing result".to_string()))?
            .value;

        Ok(value.pop().flatten())
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    async fn confirm_transaction(
        &self,
        signature: &TxSignature,
        commitment: Commitment,
        timeout: Duration,
    ) -> Result<(), ChainError> {
        let started = Instant::now();

        loop {
            match self.signature_status(signature).await {
                Ok(Some(status)) => {
                    if let Some(err) = status.err {
                        return Err(ChainError::TransactionFailed {
                            signature: signature.clone(),
                            reason: err.to_string(),
                        });
                    }
                    let reached = status
                        .confirmation_status
                        .as_deref()
                        .and_then(Commitment::from_status);
                    if reached.is_some_and(|c| c >= commitment) {
                        tracing::debug!(%signature, ?commitment, "transaction confirmed");
                        return Ok(());
                    }
                }
                Ok(None) => {
                    // Not yet visible to the node; keep waiting
                }
                Err(ChainError::Rpc(message)) => {
                    // Transient RPC trouble does not decide the transaction
                    tracing::warn!(%signature, %message, "status query failed, retrying");
                }
                Err(other) => return Err(other),
            }

            if started.elapsed() >= timeout {
                return Err(ChainError::ConfirmationTimeout {
                    signature: signature.clone(),
                    elapsed: started.elapsed(),
                });
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }
}
