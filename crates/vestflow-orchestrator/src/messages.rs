//! User-facing error copy
//!
//! Classifies underlying error text into actionable messages. Matching is
//! substring-based because wallet adapters and backends do not share an
//! error vocabulary; anything unrecognized falls back to "try again".

use crate::error::ClaimError;

/// Broad category of a failure, for copy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// User declined or cancelled
    Cancelled,
    /// Not enough SOL for the fee
    InsufficientFunds,
    /// Something timed out
    Timeout,
    /// Asked for more than is claimable
    ExceedsBalance,
    /// Wallet not connected
    WalletDisconnected,
    /// Anything else
    Unknown,
}

/// Classify raw error text
#[must_use]
pub fn classify_text(message: &str) -> MessageKind {
    let lower = message.to_lowercase();
    if lower.contains("rejected") || lower.contains("cancelled") || lower.contains("declined") {
        MessageKind::Cancelled
    } else if lower.contains("insufficient")
        || lower.contains("no record of a prior credit")
        || lower.contains("debit an account")
    {
        MessageKind::InsufficientFunds
    } else if lower.contains("exceeds balance") || lower.contains("exceeds available") {
        MessageKind::ExceedsBalance
    } else if lower.contains("timeout") || lower.contains("timed out") {
        MessageKind::Timeout
    } else if lower.contains("wallet disconnected") || lower.contains("not connected") {
        MessageKind::WalletDisconnected
    } else {
        MessageKind::Unknown
    }
}

/// User-facing message for a claim failure
#[must_use]
pub fn friendly_message(error: &ClaimError) -> String {
    match error {
        ClaimError::WalletNotReady => {
            "Connect a wallet that supports transaction signing to claim.".to_string()
        }
        ClaimError::AttemptInFlight => {
            "A claim is already in progress. Wait for it to finish.".to_string()
        }
        ClaimError::UserRejected => {
            "You declined the fee payment, so nothing was charged. Claim again whenever you're ready.".to_string()
        }
        ClaimError::InsufficientGasFunds { required_sol } => format!(
            "You need {required_sol:.4} SOL to pay the claim fee. Add SOL to your wallet and try again."
        ),
        ClaimError::Quote(message) => match classify_text(message) {
            MessageKind::ExceedsBalance => {
                "The requested amount exceeds your claimable balance.".to_string()
            }
            _ => format!("Could not prepare your claim: {message}"),
        },
        ClaimError::FeeBroadcast(message) => match classify_text(message) {
            MessageKind::InsufficientFunds => {
                "Your wallet could not cover the fee transaction. Add SOL and try again.".to_string()
            }
            MessageKind::Cancelled => {
                "The fee payment was cancelled. Nothing was charged.".to_string()
            }
            _ => "The fee payment could not be sent. Nothing was charged; please try again.".to_string(),
        },
        ClaimError::FeeConfirmationTimeout { signature, .. } => format!(
            "The fee payment could not be confirmed in time. If it went through, contact support with signature {signature}."
        ),
        ClaimError::CompletionFailed { signature, .. } => format!(
            "Your fee was charged but the claim did not complete. Contact support with signature {signature} to finish your claim."
        ),
        ClaimError::OnChainTransactionFailed { signature, .. } => format!(
            "The token transfer failed on chain despite the fee payment. Contact support with signature {signature}."
        ),
        ClaimError::Phase(_) => "Something went wrong. Please try again.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use vestflow_types::TxSignature;

    #[test]
    fn wallet_substrings_classify() {
        assert_eq!(
            classify_text("User rejected the request"),
            MessageKind::Cancelled
        );
        assert_eq!(
            classify_text("Transaction cancelled by user"),
            MessageKind::Cancelled
        );
        assert_eq!(
            classify_text("Attempt to debit an account but found no record of a prior credit"),
            MessageKind::InsufficientFunds
        );
        assert_eq!(
            classify_text("Insufficient SOL balance"),
            MessageKind::InsufficientFunds
        );
        assert_eq!(
            classify_text("requested amount exceeds available balance"),
            MessageKind::ExceedsBalance
        );
        assert_eq!(
            classify_text("confirmation timeout (60s)"),
            MessageKind::Timeout
        );
        assert_eq!(classify_text("wallet disconnected"), MessageKind::WalletDisconnected);
        assert_eq!(classify_text("weird rpc glitch"), MessageKind::Unknown);
    }

    #[test]
    fn reconciliation_errors_name_the_signature() {
        let err = ClaimError::CompletionFailed {
            signature: TxSignature::new("fee-sig-42"),
            attempts: 3,
            last_error: "backend 503".to_string(),
        };
        assert!(friendly_message(&err).contains("fee-sig-42"));

        let err = ClaimError::FeeConfirmationTimeout {
            signature: TxSignature::new("fee-sig-43"),
            timeout: Duration::from_secs(60),
        };
        assert!(friendly_message(&err).contains("fee-sig-43"));
    }

    #[test]
    fn unknown_errors_get_generic_copy() {
        let err = ClaimError::FeeBroadcast("0x1771 custom program error".to_string());
        let copy = friendly_message(&err);
        assert!(copy.contains("try again"));
    }
}
