//! Claim orchestrator
//!
//! Drives one claim from user intent to a terminal outcome across the
//! backend, the wallet, and the chain. The saga is linear; the only loops
//! are the bounded completion retry and the bounded status poll.

use crate::attempt::ClaimAttempt;
use crate::config::OrchestratorConfig;
use crate::error::ClaimError;
use crate::phase::ClaimPhase;
use crate::progress::{ObserverSet, ProgressObserver, ProgressUpdate};
use std::sync::Arc;
use tokio::sync::Mutex;
use vestflow_client::{
    poll_until, retry_with_backoff, BackendClient, ChainClient, ChainError, PollOutcome,
    UnsignedTransaction, WalletError, WalletSigner,
};
use vestflow_types::{
    AttemptId, ClaimCompletionResult, ClaimQuote, ClaimStatus, PoolId, TxSignature, WalletAddress,
};

/// What the user asked to claim
#[derive(Debug, Clone)]
pub struct ClaimRequest {
    /// Claiming wallet
    pub wallet: WalletAddress,
    /// Requested amount; `None` claims everything available
    pub amount: Option<f64>,
    /// Restrict the claim to one pool
    pub pool_id: Option<PoolId>,
}

impl ClaimRequest {
    /// Claim everything available for a wallet
    #[inline]
    pub fn new(wallet: impl Into<WalletAddress>) -> Self {
        Self {
            wallet: wallet.into(),
            amount: None,
            pool_id: None,
        }
    }

    /// With a specific amount
    #[inline]
    #[must_use]
    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// With a specific pool
    #[inline]
    #[must_use]
    pub fn with_pool(mut self, pool_id: PoolId) -> Self {
        self.pool_id = Some(pool_id);
        self
    }
}

/// How sure we are the token transfer landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Backend reported the transfer confirmed
    Confirmed,
    /// Poll budget ran out while the transfer was still pending; the
    /// backend remains the source of truth
    Unverified,
}

/// Terminal result of a successful claim
#[derive(Debug, Clone)]
pub struct ClaimOutcome {
    /// Attempt that produced this outcome
    pub attempt_id: AttemptId,
    /// Authoritative completion record from the backend
    pub completion: ClaimCompletionResult,
    /// Confirmed fee payment signature
    pub fee_signature: TxSignature,
    /// Whether the transfer was verified client-side
    pub confirmation: Confirmation,
}

/// Drives the claim-with-fee saga
///
/// One attempt at a time: a second `execute` while one is running fails
/// with [`ClaimError::AttemptInFlight`]. That guard is a client-side
/// convenience; protection against duplicate claims is the backend's
/// fee-signature deduplication.
pub struct ClaimOrchestrator {
    config: OrchestratorConfig,
    backend: Arc<dyn BackendClient>,
    wallet: Arc<dyn WalletSigner>,
    chain: Arc<dyn ChainClient>,
    observers: ObserverSet,
    in_flight: Mutex<()>,
}

impl ClaimOrchestrator {
    /// Create an orchestrator over the three collaborators
    #[must_use]
    pub fn new(
        config: OrchestratorConfig,
        backend: Arc<dyn BackendClient>,
        wallet: Arc<dyn WalletSigner>,
        chain: Arc<dyn ChainClient>,
    ) -> Self {
        Self {
            config,
            backend,
            wallet,
            chain,
            observers: ObserverSet::default(),
            in_flight: Mutex::new(()),
        }
    }

    /// Register a progress observer
    pub fn register_observer(&self, observer: Arc<dyn ProgressObserver>) {
        self.observers.register(observer);
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Execute one claim end to end
    ///
    /// # Errors
    /// A [`ClaimError`] naming the semantic outcome; see the taxonomy for
    /// which errors left funds moved and which are safe to rerun.
    pub async fn execute(&self, request: ClaimRequest) -> Result<ClaimOutcome, ClaimError> {
        // Precondition, before any state or network: a signer must exist
        if !self.wallet.is_ready() {
            return Err(ClaimError::WalletNotReady);
        }

        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| ClaimError::AttemptInFlight)?;

        let mut attempt = ClaimAttempt::new();
        tracing::info!(attempt = %attempt.id, wallet = %request.wallet, "starting claim");

        match self.run(&mut attempt, &request).await {
            Ok(outcome) => {
                tracing::info!(
                    attempt = %attempt.id,
                    amount = outcome.completion.amount_claimed,
                    token_tx = %outcome.completion.token_transaction_signature,
                    "claim fulfilled"
                );
                Ok(outcome)
            }
            Err(error) => {
                tracing::error!(attempt = %attempt.id, %error, "claim failed");
                attempt.fail(error.to_string());
                self.observers.notify(&ProgressUpdate {
                    attempt_id: attempt.id,
                    phase: ClaimPhase::Error,
                    percent: attempt.progress_percent,
                    fee_signature: attempt.fee_signature.clone(),
                });
                Err(error)
            }
        }
    }

    async fn run(
        &self,
        attempt: &mut ClaimAttempt,
        request: &ClaimRequest,
    ) -> Result<ClaimOutcome, ClaimError> {
        let quote = self.prepare(attempt, request).await?;
        let signed = self.sign_fee(attempt, &quote).await?;
        let fee_signature = self.broadcast_and_confirm_fee(attempt, &quote, &signed).await?;
        let completion = self
            .complete(attempt, request, &quote, &fee_signature)
            .await?;
        let confirmation = self.confirm_claim(attempt, &completion).await?;

        self.advance(attempt, ClaimPhase::Success)?;
        Ok(ClaimOutcome {
            attempt_id: attempt.id,
            completion,
            fee_signature,
            confirmation,
        })
    }

    /// Quote request and validation; nothing is signed before this passes
    async fn prepare(
        &self,
        attempt: &mut ClaimAttempt,
        request: &ClaimRequest,
    ) -> Result<ClaimQuote, ClaimError> {
        self.advance(attempt, ClaimPhase::Preparing)?;

        let quote = self
            .backend
            .initiate_claim(&request.wallet, request.amount, request.pool_id.clone())
            .await
            .map_err(|e| ClaimError::Quote(e.to_string()))?;

        quote
            .validate(request.amount)
            .map_err(|e| ClaimError::Quote(e.to_string()))?;

        tracing::info!(
            amount = quote.amount_to_claim,
            available = quote.total_available,
            fee_sol = quote.fee.amount_sol,
            fee_usd = quote.fee.amount_usd,
            pools = quote.pool_breakdown.len(),
            "quote received"
        );
        Ok(quote)
    }

    async fn sign_fee(
        &self,
        attempt: &mut ClaimAttempt,
        quote: &ClaimQuote,
    ) -> Result<vestflow_client::SignedTransaction, ClaimError> {
        self.advance(attempt, ClaimPhase::SigningFee)?;

        let unsigned = UnsignedTransaction::new(quote.unsigned_fee_transaction.clone());
        self.wallet.sign(&unsigned).await.map_err(|e| match e {
            WalletError::Rejected => ClaimError::UserRejected,
            WalletError::NotConnected => ClaimError::WalletNotReady,
            other => ClaimError::FeeBroadcast(other.to_string()),
        })
    }

    /// Broadcast the fee payment and wait for confirmation
    ///
    /// From the moment broadcast succeeds, the signature rides along on
    /// every progress update and every error.
    async fn broadcast_and_confirm_fee(
        &self,
        attempt: &mut ClaimAttempt,
        quote: &ClaimQuote,
        signed: &vestflow_client::SignedTransaction,
    ) -> Result<TxSignature, ClaimError> {
        self.advance(attempt, ClaimPhase::ConfirmingFee)?;

        let fee_signature = self.wallet.broadcast(signed).await.map_err(|e| match e {
            WalletError::InsufficientFunds => ClaimError::InsufficientGasFunds {
                required_sol: quote.fee.amount_sol,
            },
            WalletError::Rejected => ClaimError::UserRejected,
            other => ClaimError::FeeBroadcast(other.to_string()),
        })?;

        attempt.set_fee_signature(fee_signature.clone());
        tracing::info!(fee_tx = %fee_signature, "fee payment broadcast, confirming");

        self.chain
            .confirm_transaction(
                &fee_signature,
                self.config.commitment,
                self.config.fee_confirmation_timeout,
            )
            .await
            .map_err(|e| match e {
                // Fee transaction failed outright: nothing was charged
                ChainError::TransactionFailed { reason, .. } => ClaimError::FeeBroadcast(reason),
                // Timeout or dead RPC both leave the fee state unknown
                ChainError::ConfirmationTimeout { .. } | ChainError::Rpc(_) => {
                    ClaimError::FeeConfirmationTimeout {
                        signature: fee_signature.clone(),
                        timeout: self.config.fee_confirmation_timeout,
                    }
                }
            })?;

        tracing::info!(fee_tx = %fee_signature, "fee payment confirmed");
        Ok(fee_signature)
    }

    /// Completion under the retry budget, same fee signature every attempt
    async fn complete(
        &self,
        attempt: &mut ClaimAttempt,
        request: &ClaimRequest,
        quote: &ClaimQuote,
        fee_signature: &TxSignature,
    ) -> Result<ClaimCompletionResult, ClaimError> {
        self.advance(attempt, ClaimPhase::ProcessingClaim)?;

        retry_with_backoff(&self.config.completion_retry, || {
            self.backend
                .complete_claim(&request.wallet, fee_signature, &quote.pool_breakdown)
        })
        .await
        .map_err(|exhausted| ClaimError::CompletionFailed {
            signature: fee_signature.clone(),
            attempts: exhausted.attempts,
            last_error: exhausted.last_error.to_string(),
        })
    }

    /// Status polling; exhaustion is a soft success, a `failed` verdict is
    /// terminal failure
    async fn confirm_claim(
        &self,
        attempt: &mut ClaimAttempt,
        completion: &ClaimCompletionResult,
    ) -> Result<Confirmation, ClaimError> {
        self.advance(attempt, ClaimPhase::ConfirmingClaim)?;

        let token_signature = completion.token_transaction_signature.clone();
        let verdict = poll_until(&self.config.status_poll, || {
            let backend = Arc::clone(&self.backend);
            let signature = token_signature.clone();
            async move {
                match backend.claim_status(&signature).await {
                    Ok(status) if status.is_terminal() => Some(status),
                    Ok(ClaimStatus::Pending) => None,
                    Ok(_) => None,
                    Err(error) => {
                        // An unreachable status endpoint does not decide
                        // the transfer; keep polling
                        tracing::warn!(token_tx = %signature, %error, "status poll failed");
                        None
                    }
                }
            }
        })
        .await;

        match verdict {
            PollOutcome::Settled(ClaimStatus::Confirmed) => Ok(Confirmation::Confirmed),
            PollOutcome::Settled(ClaimStatus::Failed { error }) => {
                Err(ClaimError::OnChainTransactionFailed {
                    signature: token_signature,
                    reason: error.unwrap_or_else(|| "transaction failed".to_string()),
                })
            }
            PollOutcome::Settled(ClaimStatus::Pending) | PollOutcome::Exhausted => {
                tracing::warn!(
                    token_tx = %token_signature,
                    "transfer not verified within poll budget; backend remains source of truth"
                );
                Ok(Confirmation::Unverified)
            }
        }
    }

    /// Move the attempt forward, log it, and tell observers
    fn advance(&self, attempt: &mut ClaimAttempt, phase: ClaimPhase) -> Result<(), ClaimError> {
        attempt.transition(phase)?;
        tracing::debug!(
            attempt = %attempt.id,
            %phase,
            percent = attempt.progress_percent,
            "phase transition"
        );
        self.observers.notify(&ProgressUpdate {
            attempt_id: attempt.id,
            phase,
            percent: attempt.progress_percent,
            fee_signature: attempt.fee_signature.clone(),
        });
        Ok(())
    }
}

impl std::fmt::Debug for ClaimOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimOrchestrator")
            .field("config", &self.config)
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}
