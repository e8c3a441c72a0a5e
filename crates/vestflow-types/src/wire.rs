//! Wire DTOs
//!
//! JSON shapes exchanged with the backend, kept separate from the domain
//! model so serde renames stay at the boundary. Conversions into domain
//! types perform the base64 decode and shape checks.

use crate::completion::{ClaimCompletionResult, ClaimHistoryItem, ClaimStatus};
use crate::ids::{PoolId, TxSignature, VestingRecordId, WalletAddress};
use crate::quote::{ClaimQuote, FeeDetails, PoolBreakdown};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// The only claim-initiate step this client understands
pub const STEP_FEE_PAYMENT_REQUIRED: &str = "fee_payment_required";

/// Body of `POST /user/vesting/claim`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimInitiateRequest {
    /// Claiming wallet
    pub user_wallet: WalletAddress,
    /// Requested amount; omitted means "everything claimable"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_to_claim: Option<f64>,
    /// Restrict the claim to one pool
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_id: Option<PoolId>,
}

/// Response of `POST /user/vesting/claim`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimInitiateResponse {
    pub success: bool,
    pub step: String,
    /// Base64-encoded serialized fee transaction
    pub fee_transaction: String,
    pub fee_details: FeeDetailsWire,
    pub claim_details: ClaimDetailsWire,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeDetailsWire {
    pub amount_usd: f64,
    pub amount_sol: f64,
    pub amount_lamports: u64,
    pub fee_wallet: WalletAddress,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimDetailsWire {
    pub amount_to_claim: f64,
    pub total_available: f64,
    pub pool_breakdown: Vec<PoolBreakdownWire>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolBreakdownWire {
    pub pool_id: PoolId,
    pub pool_name: String,
    pub amount_to_claim: f64,
    pub available_from_pool: f64,
    #[serde(rename = "vestingId")]
    pub vesting_record_id: VestingRecordId,
}

/// Body of `POST /user/vesting/complete-claim`
///
/// The backend deduplicates on `fee_signature`; sending the same body twice
/// must not transfer tokens twice.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteClaimRequest {
    pub user_wallet: WalletAddress,
    pub fee_signature: TxSignature,
    pub pool_breakdown: Vec<PoolBreakdownWire>,
}

/// Response of `POST /user/vesting/complete-claim`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteClaimResponse {
    pub success: bool,
    pub total_amount_claimed: f64,
    pub pool_breakdown: Vec<PoolBreakdownWire>,
    pub token_transaction_signature: TxSignature,
}

/// Response of `GET /user/vesting/claim-status/{signature}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimStatusResponse {
    pub success: bool,
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of `GET /user/vesting/history`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<ClaimHistoryItem>,
}

/// Error body the backend attaches to non-2xx responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Best available message, if the body carried one
    #[must_use]
    pub fn into_message(self) -> Option<String> {
        self.error.or(self.message)
    }
}

/// Wire-to-domain conversion failures
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// Backend reported an unsuccessful operation without an HTTP error
    #[error("backend reported failure")]
    Unsuccessful,

    /// Claim initiation returned an unknown step
    #[error("unexpected claim step: {0:?}")]
    UnexpectedStep(String),

    /// Fee transaction payload is not valid base64
    #[error("fee transaction is not valid base64: {0}")]
    FeeTransactionEncoding(#[from] base64::DecodeError),

    /// Status string outside the pending/confirmed/failed contract
    #[error("unknown claim status: {0:?}")]
    UnknownStatus(String),
}

impl From<PoolBreakdownWire> for PoolBreakdown {
    fn from(w: PoolBreakdownWire) -> Self {
        Self {
            pool_id: w.pool_id,
            pool_name: w.pool_name,
            amount_to_claim: w.amount_to_claim,
            available_from_pool: w.available_from_pool,
            vesting_record_id: w.vesting_record_id,
        }
    }
}

impl From<PoolBreakdown> for PoolBreakdownWire {
    fn from(d: PoolBreakdown) -> Self {
        Self {
            pool_id: d.pool_id,
            pool_name: d.pool_name,
            amount_to_claim: d.amount_to_claim,
            available_from_pool: d.available_from_pool,
            vesting_record_id: d.vesting_record_id,
        }
    }
}

impl TryFrom<ClaimInitiateResponse> for ClaimQuote {
    type Error = WireError;

    fn try_from(r: ClaimInitiateResponse) -> Result<Self, Self::Error> {
        if !r.success {
            return Err(WireError::Unsuccessful);
        }
        if r.step != STEP_FEE_PAYMENT_REQUIRED {
            return Err(WireError::UnexpectedStep(r.step));
        }

        let unsigned_fee_transaction = BASE64.decode(r.fee_transaction.as_bytes())?;

        Ok(Self {
            amount_to_claim: r.claim_details.amount_to_claim,
            total_available: r.claim_details.total_available,
            fee: FeeDetails {
                amount_usd: r.fee_details.amount_usd,
                amount_sol: r.fee_details.amount_sol,
                amount_lamports: r.fee_details.amount_lamports,
                fee_wallet: r.fee_details.fee_wallet,
            },
            unsigned_fee_transaction,
            pool_breakdown: r
                .claim_details
                .pool_breakdown
                .into_iter()
                .map(PoolBreakdown::from)
                .collect(),
        })
    }
}

impl TryFrom<CompleteClaimResponse> for ClaimCompletionResult {
    type Error = WireError;

    fn try_from(r: CompleteClaimResponse) -> Result<Self, Self::Error> {
        if !r.success {
            return Err(WireError::Unsuccessful);
        }
        Ok(Self {
            amount_claimed: r.total_amount_claimed,
            token_transaction_signature: r.token_transaction_signature,
            pool_breakdown: r
                .pool_breakdown
                .into_iter()
                .map(PoolBreakdown::from)
                .collect(),
        })
    }
}

impl TryFrom<ClaimStatusResponse> for ClaimStatus {
    type Error = WireError;

    fn try_from(r: ClaimStatusResponse) -> Result<Self, Self::Error> {
        match r.status.as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "failed" => Ok(Self::Failed { error: r.error }),
            other => Err(WireError::UnknownStatus(other.to_string())),
        }
    }
}
