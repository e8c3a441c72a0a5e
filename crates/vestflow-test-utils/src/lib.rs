//! Testing utilities for the vestflow workspace
//!
//! Scripted fakes for the three collaborator seams plus quote/completion
//! fixtures. Fakes record every call so tests can assert on ordering and
//! counts, and their behavior is set per-test rather than mocked per-call.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use vestflow_client::{
    BackendClient, BackendError, ChainClient, ChainError, Commitment, SignedTransaction,
    UnsignedTransaction, WalletError, WalletSigner,
};
use vestflow_types::{
    ClaimCompletionResult, ClaimHistoryItem, ClaimQuote, ClaimStatus, FeeDetails, PoolBreakdown,
    PoolId, TxSignature, VestingRecordId, WalletAddress,
};

/// Quote fixture with one pool and a valid fee transaction
pub fn quote_fixture(amount: f64, available: f64) -> ClaimQuote {
    ClaimQuote {
        amount_to_claim: amount,
        total_available: available,
        fee: FeeDetails {
            amount_usd: 1.5,
            amount_sol: 0.0075,
            amount_lamports: 7_500_000,
            fee_wallet: WalletAddress::new("FeeWallet1111111111111111111111111111111111"),
        },
        unsigned_fee_transaction: b"unsigned-fee-tx".to_vec(),
        pool_breakdown: vec![PoolBreakdown {
            pool_id: PoolId::new("pool-1"),
            pool_name: "Community".to_string(),
            amount_to_claim: amount,
            available_from_pool: available,
            vesting_record_id: VestingRecordId::new("vr-1"),
        }],
    }
}

/// Completion fixture matching [`quote_fixture`]
pub fn completion_fixture(amount: f64, token_signature: &str) -> ClaimCompletionResult {
    ClaimCompletionResult {
        amount_claimed: amount,
        token_transaction_signature: TxSignature::new(token_signature),
        pool_breakdown: quote_fixture(amount, amount).pool_breakdown,
    }
}

fn backend_unavailable() -> BackendError {
    BackendError::Http {
        status: 503,
        message: "service unavailable".to_string(),
    }
}

/// Scripted wallet behaviors
#[derive(Debug, Clone)]
pub enum SignBehavior {
    Sign,
    Reject,
    Fail(String),
}

#[derive(Debug, Clone)]
pub enum BroadcastBehavior {
    Broadcast(String),
    InsufficientFunds,
    Fail(String),
}

/// Fake wallet recording sign/broadcast calls
pub struct FakeWallet {
    pub ready: bool,
    pub sign_behavior: SignBehavior,
    pub broadcast_behavior: BroadcastBehavior,
    pub sign_calls: AtomicU32,
    pub broadcast_calls: AtomicU32,
}

impl FakeWallet {
    /// Wallet that signs and broadcasts successfully
    pub fn cooperative(signature: &str) -> Self {
        Self {
            ready: true,
            sign_behavior: SignBehavior::Sign,
            broadcast_behavior: BroadcastBehavior::Broadcast(signature.to_string()),
            sign_calls: AtomicU32::new(0),
            broadcast_calls: AtomicU32::new(0),
        }
    }

    /// Wallet whose user declines the prompt
    pub fn rejecting() -> Self {
        Self {
            sign_behavior: SignBehavior::Reject,
            ..Self::cooperative("unused")
        }
    }

    /// Wallet with no signer connected
    pub fn disconnected() -> Self {
        Self {
            ready: false,
            ..Self::cooperative("unused")
        }
    }
}

#[async_trait]
impl WalletSigner for FakeWallet {
    fn is_ready(&self) -> bool {
        self.ready
    }

    async fn sign(&self, tx: &UnsignedTransaction) -> Result<SignedTransaction, WalletError> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        match &self.sign_behavior {
            SignBehavior::Sign => {
                let mut bytes = tx.as_bytes().to_vec();
                bytes.extend_from_slice(b"+sig");
                Ok(SignedTransaction::new(bytes))
            }
            SignBehavior::Reject => Err(WalletError::Rejected),
            SignBehavior::Fail(msg) => Err(WalletError::Signing(msg.clone())),
        }
    }

    async fn broadcast(&self, _tx: &SignedTransaction) -> Result<TxSignature, WalletError> {
        self.broadcast_calls.fetch_add(1, Ordering::SeqCst);
        match &self.broadcast_behavior {
            BroadcastBehavior::Broadcast(sig) => Ok(TxSignature::new(sig.clone())),
            BroadcastBehavior::InsufficientFunds => Err(WalletError::InsufficientFunds),
            BroadcastBehavior::Fail(msg) => Err(WalletError::Broadcast(msg.clone())),
        }
    }
}

/// Scripted chain behaviors
#[derive(Debug, Clone)]
pub enum ChainBehavior {
    Confirm,
    Timeout,
    FailOnChain(String),
}

/// Fake chain confirmation
pub struct FakeChain {
    pub behavior: ChainBehavior,
    pub confirm_calls: AtomicU32,
}

impl FakeChain {
    pub fn confirming() -> Self {
        Self {
            behavior: ChainBehavior::Confirm,
            confirm_calls: AtomicU32::new(0),
        }
    }

    pub fn timing_out() -> Self {
        Self {
            behavior: ChainBehavior::Timeout,
            confirm_calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl ChainClient for FakeChain {
    async fn confirm_transaction(
        &self,
        signature: &TxSignature,
        _commitment: Commitment,
        timeout: Duration,
    ) -> Result<(), ChainError> {
        self.confirm_calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            ChainBehavior::Confirm => Ok(()),
            ChainBehavior::Timeout => Err(ChainError::ConfirmationTimeout {
                signature: signature.clone(),
                elapsed: timeout,
            }),
            ChainBehavior::FailOnChain(reason) => Err(ChainError::TransactionFailed {
                signature: signature.clone(),
                reason: reason.clone(),
            }),
        }
    }
}

/// Fake backend with scripted completion results and status verdicts
///
/// `complete_results` is consumed front to back, one entry per call; when
/// it runs dry, completion succeeds with `completion`. `status_script` is
/// consumed one entry per poll; when it runs dry, status stays `Pending`.
pub struct FakeBackend {
    pub quote: Mutex<Option<ClaimQuote>>,
    pub completion: ClaimCompletionResult,
    pub complete_results: Mutex<VecDeque<Result<ClaimCompletionResult, BackendError>>>,
    pub status_script: Mutex<VecDeque<ClaimStatus>>,
    pub history: Mutex<Vec<ClaimHistoryItem>>,
    pub initiate_calls: AtomicU32,
    pub complete_calls: Mutex<Vec<TxSignature>>,
    pub status_calls: AtomicU32,
}

impl FakeBackend {
    /// Backend where everything succeeds first try
    pub fn happy(quote: ClaimQuote, completion: ClaimCompletionResult) -> Self {
        Self {
            quote: Mutex::new(Some(quote)),
            completion,
            complete_results: Mutex::new(VecDeque::new()),
            status_script: Mutex::new(VecDeque::from([ClaimStatus::Confirmed])),
            history: Mutex::new(Vec::new()),
            initiate_calls: AtomicU32::new(0),
            complete_calls: Mutex::new(Vec::new()),
            status_calls: AtomicU32::new(0),
        }
    }

    /// Queue completion failures ahead of the eventual success
    pub fn fail_completion_times(&self, times: u32) {
        let mut script = self.complete_results.lock();
        for _ in 0..times {
            script.push_back(Err(backend_unavailable()));
        }
    }

    /// Replace the status script
    pub fn script_status(&self, verdicts: impl IntoIterator<Item = ClaimStatus>) {
        *self.status_script.lock() = verdicts.into_iter().collect();
    }

    /// Fee signatures seen by `complete_claim`, in call order
    pub fn completion_signatures(&self) -> Vec<TxSignature> {
        self.complete_calls.lock().clone()
    }
}

#[async_trait]
impl BackendClient for FakeBackend {
    async fn initiate_claim(
        &self,
        _wallet: &WalletAddress,
        _amount: Option<f64>,
        _pool_id: Option<PoolId>,
    ) -> Result<ClaimQuote, BackendError> {
        self.initiate_calls.fetch_add(1, Ordering::SeqCst);
        self.quote.lock().clone().ok_or_else(|| BackendError::Http {
            status: 400,
            message: "nothing claimable".to_string(),
        })
    }

    async fn complete_claim(
        &self,
        _wallet: &WalletAddress,
        fee_signature: &TxSignature,
        _pool_breakdown: &[PoolBreakdown],
    ) -> Result<ClaimCompletionResult, BackendError> {
        self.complete_calls.lock().push(fee_signature.clone());
        match self.complete_results.lock().pop_front() {
            Some(result) => result,
            None => Ok(self.completion.clone()),
        }
    }

    async fn claim_status(
        &self,
        _token_signature: &TxSignature,
    ) -> Result<ClaimStatus, BackendError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .status_script
            .lock()
            .pop_front()
            .unwrap_or(ClaimStatus::Pending))
    }

    async fn claim_history(
        &self,
        _wallet: &WalletAddress,
    ) -> Result<Vec<ClaimHistoryItem>, BackendError> {
        Ok(self.history.lock().clone())
    }
}
