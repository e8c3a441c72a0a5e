//! Claim quotes
//!
//! A [`ClaimQuote`] is produced by the backend in response to a claim
//! initiation request and consumed once per attempt. It carries the unsigned
//! fee payment transaction the user must sign before the backend will
//! release tokens.

use crate::ids::{PoolId, VestingRecordId, WalletAddress};

/// Tolerance for comparing token amounts that crossed a JSON boundary
const AMOUNT_EPSILON: f64 = 1e-6;

/// Per-pool share of a claim
#[derive(Debug, Clone, PartialEq)]
pub struct PoolBreakdown {
    /// Pool identifier
    pub pool_id: PoolId,
    /// Human-readable pool name
    pub pool_name: String,
    /// Amount claimed from this pool
    pub amount_to_claim: f64,
    /// Total currently claimable from this pool
    pub available_from_pool: f64,
    /// Vesting record this share draws from
    pub vesting_record_id: VestingRecordId,
}

/// Fee payment details quoted by the backend
#[derive(Debug, Clone, PartialEq)]
pub struct FeeDetails {
    /// Fee in USD
    pub amount_usd: f64,
    /// Fee in SOL
    pub amount_sol: f64,
    /// Fee in lamports (what the transaction actually moves)
    pub amount_lamports: u64,
    /// Destination wallet for the fee
    pub fee_wallet: WalletAddress,
}

/// Immutable claim quote received from the backend
///
/// Invariants (checked by [`ClaimQuote::validate`]):
/// - the unsigned fee transaction is non-empty
/// - `amount_to_claim <= total_available`
/// - the pool breakdown sums to `amount_to_claim`
#[derive(Debug, Clone)]
pub struct ClaimQuote {
    /// Amount the backend will transfer on completion
    pub amount_to_claim: f64,
    /// Total claimable across all pools for this wallet
    pub total_available: f64,
    /// Fee the user pays up front
    pub fee: FeeDetails,
    /// Serialized unsigned fee transaction (decoded from base64)
    pub unsigned_fee_transaction: Vec<u8>,
    /// Per-pool shares of the claim
    pub pool_breakdown: Vec<PoolBreakdown>,
}

impl ClaimQuote {
    /// Check quote invariants and the requested amount against availability
    ///
    /// Runs before any transaction is constructed: a quote that fails here
    /// never reaches the wallet.
    ///
    /// # Errors
    /// - [`QuoteValidationError::EmptyFeeTransaction`]
    /// - [`QuoteValidationError::ExceedsAvailable`]
    /// - [`QuoteValidationError::BreakdownMismatch`]
    /// - [`QuoteValidationError::RequestedExceedsAvailable`]
    pub fn validate(&self, requested: Option<f64>) -> Result<(), QuoteValidationError> {
        if self.unsigned_fee_transaction.is_empty() {
            return Err(QuoteValidationError::EmptyFeeTransaction);
        }

        if self.amount_to_claim > self.total_available + AMOUNT_EPSILON {
            return Err(QuoteValidationError::ExceedsAvailable {
                amount: self.amount_to_claim,
                available: self.total_available,
            });
        }

        let breakdown_sum: f64 = self.pool_breakdown.iter().map(|p| p.amount_to_claim).sum();
        if (breakdown_sum - self.amount_to_claim).abs() > AMOUNT_EPSILON {
            return Err(QuoteValidationError::BreakdownMismatch {
                breakdown_sum,
                amount: self.amount_to_claim,
            });
        }

        if let Some(requested) = requested {
            if requested > self.total_available + AMOUNT_EPSILON {
                return Err(QuoteValidationError::RequestedExceedsAvailable {
                    requested,
                    available: self.total_available,
                });
            }
        }

        Ok(())
    }
}

/// Quote invariant violations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuoteValidationError {
    /// Backend returned no fee transaction
    #[error("quote carries no fee transaction")]
    EmptyFeeTransaction,

    /// Quoted amount exceeds availability
    #[error("quoted amount {amount} exceeds available {available}")]
    ExceedsAvailable { amount: f64, available: f64 },

    /// Pool breakdown does not sum to the quoted amount
    #[error("pool breakdown sums to {breakdown_sum}, quote says {amount}")]
    BreakdownMismatch { breakdown_sum: f64, amount: f64 },

    /// Caller requested more than is available
    #[error("requested {requested} exceeds available balance {available}")]
    RequestedExceedsAvailable { requested: f64, available: f64 },
}
