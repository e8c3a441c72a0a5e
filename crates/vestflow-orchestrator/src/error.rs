//! Claim error taxonomy
//!
//! Semantic outcomes, not implementation exceptions. Two questions matter
//! to a caller: did funds move, and is it safe to run the whole flow again.
//! Errors after the fee broadcast carry the fee signature so a charged but
//! incomplete claim can be reconciled out of band.

use crate::phase::PhaseError;
use std::time::Duration;
use vestflow_types::TxSignature;

/// Terminal failure of a claim attempt
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClaimError {
    /// No connected wallet capable of signing; nothing was attempted
    #[error("wallet not connected or does not support signing")]
    WalletNotReady,

    /// Another attempt from this orchestrator is still running
    #[error("a claim attempt is already in flight")]
    AttemptInFlight,

    /// User declined the signature prompt; never retried automatically
    #[error("fee payment was rejected in the wallet")]
    UserRejected,

    /// Backend could not produce a usable quote, or the quote failed
    /// validation; no transaction was constructed
    #[error("claim quote rejected: {0}")]
    Quote(String),

    /// Wallet cannot cover the fee transaction's own network cost
    #[error("insufficient funds for the {required_sol} SOL claim fee")]
    InsufficientGasFunds {
        /// Fee amount the quote asked for
        required_sol: f64,
    },

    /// Fee payment could not be signed or broadcast; no funds moved
    #[error("fee payment failed: {0}")]
    FeeBroadcast(String),

    /// Fee payment broadcast but unconfirmed within budget; state unknown
    #[error("fee payment {signature} unconfirmed after {timeout:?}; it may still land")]
    FeeConfirmationTimeout {
        /// Broadcast signature, for reconciliation
        signature: TxSignature,
        /// Confirmation budget that elapsed
        timeout: Duration,
    },

    /// Fee confirmed but completion kept failing; fee was charged
    ///
    /// Rerunning the whole flow would pay the fee twice. Surface the
    /// signature to support instead.
    #[error("claim not completed after {attempts} attempts; fee was charged as {signature}: {last_error}")]
    CompletionFailed {
        /// Confirmed fee payment signature
        signature: TxSignature,
        /// Completion attempts made
        attempts: u32,
        /// Final attempt's error
        last_error: String,
    },

    /// Backend reports the token transfer failed on chain after submission
    #[error("token transfer {signature} failed on chain: {reason}")]
    OnChainTransactionFailed {
        /// Token transfer signature
        signature: TxSignature,
        /// Backend-reported reason
        reason: String,
    },

    /// Internal phase bookkeeping violation; indicates a bug, not an
    /// environmental failure
    #[error("internal: {0}")]
    Phase(#[from] PhaseError),
}

impl ClaimError {
    /// Whether rerunning the whole flow is safe and potentially useful
    ///
    /// False when the user said no, or when a fee is already spent.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            Self::UserRejected
                | Self::CompletionFailed { .. }
                | Self::OnChainTransactionFailed { .. }
        )
    }

    /// Whether the fee payment definitely left the wallet
    #[inline]
    #[must_use]
    pub fn funds_moved(&self) -> bool {
        matches!(
            self,
            Self::CompletionFailed { .. } | Self::OnChainTransactionFailed { .. }
        )
    }

    /// Signature to reconcile against, when one exists
    #[must_use]
    pub fn signature(&self) -> Option<&TxSignature> {
        match self {
            Self::FeeConfirmationTimeout { signature, .. }
            | Self::CompletionFailed { signature, .. }
            | Self::OnChainTransactionFailed { signature, .. } => Some(signature),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_rejection_is_not_retryable() {
        assert!(!ClaimError::UserRejected.is_retryable());
        assert!(!ClaimError::UserRejected.funds_moved());
    }

    #[test]
    fn pre_broadcast_errors_are_retryable() {
        assert!(ClaimError::WalletNotReady.is_retryable());
        assert!(ClaimError::Quote("nothing claimable".to_string()).is_retryable());
        assert!(ClaimError::InsufficientGasFunds { required_sol: 0.01 }.is_retryable());
        assert!(ClaimError::FeeBroadcast("blockhash expired".to_string()).is_retryable());
    }

    #[test]
    fn unknown_fee_state_is_retryable_but_carries_signature() {
        let err = ClaimError::FeeConfirmationTimeout {
            signature: TxSignature::new("fee-sig"),
            timeout: Duration::from_secs(60),
        };
        assert!(err.is_retryable());
        assert!(!err.funds_moved());
        assert_eq!(err.signature().unwrap().as_str(), "fee-sig");
    }

    #[test]
    fn spent_fee_blocks_retry() {
        let err = ClaimError::CompletionFailed {
            signature: TxSignature::new("fee-sig"),
            attempts: 3,
            last_error: "backend 500".to_string(),
        };
        assert!(!err.is_retryable());
        assert!(err.funds_moved());
        assert_eq!(err.signature().unwrap().as_str(), "fee-sig");
    }
}
