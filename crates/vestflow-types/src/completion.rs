//! Claim completion and status
//!
//! A [`ClaimCompletionResult`] is the backend's authoritative record of a
//! fulfilled claim; [`ClaimStatus`] tracks the token transfer it submitted.

use crate::ids::{TxSignature, VestingRecordId};
use crate::quote::PoolBreakdown;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authoritative record of a fulfilled claim
///
/// Produced by the backend after it verifies the fee payment and performs
/// the token transfer. Never mutated locally.
#[derive(Debug, Clone)]
pub struct ClaimCompletionResult {
    /// Amount actually transferred
    pub amount_claimed: f64,
    /// Signature of the backend-submitted token transfer
    pub token_transaction_signature: TxSignature,
    /// Per-pool shares fulfilled
    pub pool_breakdown: Vec<PoolBreakdown>,
}

/// Status of the token transfer as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimStatus {
    /// Transfer submitted, not yet confirmed
    Pending,
    /// Transfer confirmed on chain
    Confirmed,
    /// Transfer failed on chain
    Failed {
        /// Backend-provided failure reason, if any
        error: Option<String>,
    },
}

impl ClaimStatus {
    /// Whether this status is terminal (polling may stop)
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// One fulfilled claim in a wallet's history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimHistoryItem {
    /// History record identifier
    pub id: String,
    /// Vesting record the claim drew from
    #[serde(rename = "vestingId")]
    pub vesting_record_id: VestingRecordId,
    /// Pool name at claim time
    pub pool_name: String,
    /// Amount claimed
    pub amount: f64,
    /// Token transfer signature
    pub signature: TxSignature,
    /// When the claim was fulfilled
    pub claimed_at: DateTime<Utc>,
}
