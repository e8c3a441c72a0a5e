//! Error types for the collaborator seams
//!
//! Each external party gets its own error enum so the orchestrator can map
//! failures to its semantic taxonomy without string matching at the seam.

use std::time::Duration;
use vestflow_types::wire::WireError;
use vestflow_types::TxSignature;

/// Backend API errors
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Non-2xx HTTP response with the backend's message, if it sent one
    #[error("backend returned {status}: {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Parsed error/message body, or the canonical reason
        message: String,
    },

    /// Connection, timeout, or protocol failure before a response arrived
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response parsed but violated the wire contract
    #[error("wire contract violation: {0}")]
    Wire(#[from] WireError),
}

impl BackendError {
    /// Whether the transport layer may retry this request
    ///
    /// Server errors, timeouts, and rate limiting are transient; everything
    /// else is a contract or caller problem.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Wire(_) => false,
        }
    }

    /// HTTP status, if this error carries one
    #[inline]
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Wire(_) => None,
        }
    }
}

/// Wallet adapter errors
///
/// `Rejected` is load-bearing: a user who declined the prompt must never be
/// retried automatically.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WalletError {
    /// No connected wallet capable of signing
    #[error("wallet not connected or does not support signing")]
    NotConnected,

    /// User declined the signature prompt
    #[error("user rejected the transaction")]
    Rejected,

    /// Wallet cannot cover the transaction's own network cost
    #[error("insufficient funds to pay the fee transaction")]
    InsufficientFunds,

    /// Signing failed for another reason
    #[error("signing failed: {0}")]
    Signing(String),

    /// Broadcast to the chain failed
    #[error("broadcast failed: {0}")]
    Broadcast(String),
}

/// Chain RPC errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChainError {
    /// No confirmation observed within the allotted time
    #[error("transaction {signature} not confirmed within {elapsed:?}")]
    ConfirmationTimeout {
        /// Broadcast signature, preserved for reconciliation
        signature: TxSignature,
        /// How long we waited
        elapsed: Duration,
    },

    /// Chain reports the transaction itself failed
    #[error("transaction {signature} failed on chain: {reason}")]
    TransactionFailed {
        signature: TxSignature,
        reason: String,
    },

    /// RPC transport or protocol failure
    #[error("rpc error: {0}")]
    Rpc(String),
}
