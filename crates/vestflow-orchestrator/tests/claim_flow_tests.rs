//! End-to-end claim flow tests over scripted collaborators

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio_test::assert_ok;
use vestflow_client::{BackendClient, BackendError, PollPolicy, RetryPolicy};
use vestflow_orchestrator::{
    ChannelObserver, ClaimError, ClaimOrchestrator, ClaimPhase, ClaimRequest, Confirmation,
    OrchestratorConfig,
};
use vestflow_test_utils::{
    completion_fixture, quote_fixture, BroadcastBehavior, ChainBehavior, FakeBackend, FakeChain,
    FakeWallet,
};
use vestflow_types::{
    ClaimCompletionResult, ClaimHistoryItem, ClaimQuote, ClaimStatus, PoolBreakdown, PoolId,
    TxSignature, WalletAddress,
};

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Capture traces per test; run with RUST_LOG=debug to see transitions
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Fast budgets so failure paths finish in milliseconds
fn test_config() -> OrchestratorConfig {
    OrchestratorConfig::new()
        .with_fee_confirmation_timeout(ms(50))
        .with_completion_retry(RetryPolicy::new(3, ms(1), ms(5), 2))
        .with_status_poll(PollPolicy::new(ms(1), 10))
}

fn orchestrator(
    backend: Arc<FakeBackend>,
    wallet: Arc<FakeWallet>,
    chain: Arc<FakeChain>,
) -> ClaimOrchestrator {
    ClaimOrchestrator::new(test_config(), backend, wallet, chain)
}

fn request() -> ClaimRequest {
    ClaimRequest::new("9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin")
}

#[tokio::test]
async fn happy_path_reports_monotone_progress_to_completion() {
    init_tracing();
    let backend = Arc::new(FakeBackend::happy(
        quote_fixture(100.0, 561.37),
        completion_fixture(100.0, "token-sig-1"),
    ));
    let wallet = Arc::new(FakeWallet::cooperative("fee-sig-1"));
    let chain = Arc::new(FakeChain::confirming());
    let orch = orchestrator(Arc::clone(&backend), wallet, chain);

    let (observer, mut updates) = ChannelObserver::new();
    orch.register_observer(observer);

    let outcome = tokio_test::assert_ok!(orch.execute(request()).await);

    assert_eq!(outcome.confirmation, Confirmation::Confirmed);
    assert_eq!(outcome.fee_signature, TxSignature::new("fee-sig-1"));
    assert_eq!(outcome.completion.amount_claimed, 100.0);

    let mut seen = Vec::new();
    while let Ok(update) = updates.try_recv() {
        seen.push(update);
    }
    let phases: Vec<ClaimPhase> = seen.iter().map(|u| u.phase).collect();
    assert_eq!(
        phases,
        vec![
            ClaimPhase::Preparing,
            ClaimPhase::SigningFee,
            ClaimPhase::ConfirmingFee,
            ClaimPhase::ProcessingClaim,
            ClaimPhase::ConfirmingClaim,
            ClaimPhase::Success,
        ]
    );
    let percents: Vec<u8> = seen.iter().map(|u| u.percent).collect();
    assert_eq!(percents, vec![10, 25, 40, 60, 80, 100]);
    assert!(percents.windows(2).all(|w| w[0] < w[1]));

    // The fee signature rides along once the broadcast succeeded
    assert!(seen[..3].iter().all(|u| u.fee_signature.is_none()));
    assert!(seen[3..].iter().all(|u| u.fee_signature.is_some()));
}

#[tokio::test]
async fn rejection_charges_nothing_and_skips_completion() {
    let backend = Arc::new(FakeBackend::happy(
        quote_fixture(100.0, 561.37),
        completion_fixture(100.0, "token-sig-1"),
    ));
    let wallet = Arc::new(FakeWallet::rejecting());
    let chain = Arc::new(FakeChain::confirming());
    let orch = orchestrator(Arc::clone(&backend), Arc::clone(&wallet), chain);

    let err = orch.execute(request()).await.unwrap_err();

    assert!(matches!(err, ClaimError::UserRejected));
    assert!(!err.is_retryable());
    assert!(!err.funds_moved());
    assert!(backend.completion_signatures().is_empty());
}

#[tokio::test]
async fn completion_retries_reuse_the_same_fee_signature() {
    init_tracing();
    let backend = Arc::new(FakeBackend::happy(
        quote_fixture(100.0, 561.37),
        completion_fixture(100.0, "token-sig-1"),
    ));
    backend.fail_completion_times(2);
    let wallet = Arc::new(FakeWallet::cooperative("fee-sig-1"));
    let chain = Arc::new(FakeChain::confirming());
    let orch = orchestrator(Arc::clone(&backend), wallet, chain);

    let outcome = tokio_test::assert_ok!(orch.execute(request()).await);

    assert_eq!(outcome.confirmation, Confirmation::Confirmed);
    let signatures = backend.completion_signatures();
    assert_eq!(signatures.len(), 3);
    assert!(signatures.iter().all(|s| s == &TxSignature::new("fee-sig-1")));
}

#[tokio::test]
async fn exhausted_completion_surfaces_the_charged_fee() {
    let backend = Arc::new(FakeBackend::happy(
        quote_fixture(100.0, 561.37),
        completion_fixture(100.0, "token-sig-1"),
    ));
    backend.fail_completion_times(3);
    let wallet = Arc::new(FakeWallet::cooperative("fee-sig-1"));
    let chain = Arc::new(FakeChain::confirming());
    let orch = orchestrator(Arc::clone(&backend), wallet, chain);

    let err = orch.execute(request()).await.unwrap_err();

    match &err {
        ClaimError::CompletionFailed {
            signature,
            attempts,
            ..
        } => {
            assert_eq!(signature, &TxSignature::new("fee-sig-1"));
            assert_eq!(*attempts, 3);
        }
        other => panic!("expected CompletionFailed, got {other:?}"),
    }
    assert!(err.funds_moved());
    assert!(!err.is_retryable());
    assert_eq!(backend.completion_signatures().len(), 3);
}

#[tokio::test]
async fn status_polling_stops_on_a_verdict() {
    let backend = Arc::new(FakeBackend::happy(
        quote_fixture(100.0, 561.37),
        completion_fixture(100.0, "token-sig-1"),
    ));
    backend.script_status([
        ClaimStatus::Pending,
        ClaimStatus::Pending,
        ClaimStatus::Confirmed,
    ]);
    let wallet = Arc::new(FakeWallet::cooperative("fee-sig-1"));
    let chain = Arc::new(FakeChain::confirming());
    let orch = orchestrator(Arc::clone(&backend), wallet, chain);

    let outcome = orch.execute(request()).await.unwrap();

    assert_eq!(outcome.confirmation, Confirmation::Confirmed);
    assert_eq!(
        backend
            .status_calls
            .load(std::sync::atomic::Ordering::SeqCst),
        3
    );
}

#[tokio::test]
async fn exhausted_status_polling_is_a_soft_success() {
    let backend = Arc::new(FakeBackend::happy(
        quote_fixture(100.0, 561.37),
        completion_fixture(100.0, "token-sig-1"),
    ));
    // Empty script: every poll answers Pending
    backend.script_status([]);
    let wallet = Arc::new(FakeWallet::cooperative("fee-sig-1"));
    let chain = Arc::new(FakeChain::confirming());
    let orch = orchestrator(Arc::clone(&backend), wallet, chain);

    let outcome = orch.execute(request()).await.unwrap();

    assert_eq!(outcome.confirmation, Confirmation::Unverified);
    assert_eq!(
        backend
            .status_calls
            .load(std::sync::atomic::Ordering::SeqCst),
        10
    );
}

#[tokio::test]
async fn failed_transfer_verdict_is_terminal_failure() {
    let backend = Arc::new(FakeBackend::happy(
        quote_fixture(100.0, 561.37),
        completion_fixture(100.0, "token-sig-1"),
    ));
    backend.script_status([
        ClaimStatus::Pending,
        ClaimStatus::Failed {
            error: Some("slippage".to_string()),
        },
    ]);
    let wallet = Arc::new(FakeWallet::cooperative("fee-sig-1"));
    let chain = Arc::new(FakeChain::confirming());
    let orch = orchestrator(backend, wallet, chain);

    let err = orch.execute(request()).await.unwrap_err();

    match err {
        ClaimError::OnChainTransactionFailed { signature, reason } => {
            assert_eq!(signature, TxSignature::new("token-sig-1"));
            assert_eq!(reason, "slippage");
        }
        other => panic!("expected OnChainTransactionFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn over_asking_fails_before_anything_is_signed() {
    let backend = Arc::new(FakeBackend::happy(
        quote_fixture(100.0, 561.37),
        completion_fixture(100.0, "token-sig-1"),
    ));
    let wallet = Arc::new(FakeWallet::cooperative("fee-sig-1"));
    let chain = Arc::new(FakeChain::confirming());
    let orch = orchestrator(Arc::clone(&backend), Arc::clone(&wallet), chain);

    let err = orch
        .execute(request().with_amount(700.0))
        .await
        .unwrap_err();

    assert!(matches!(err, ClaimError::Quote(_)));
    assert_eq!(
        wallet.sign_calls.load(std::sync::atomic::Ordering::SeqCst),
        0
    );
    assert!(backend.completion_signatures().is_empty());
}

#[tokio::test]
async fn unconfirmed_fee_carries_its_signature_and_skips_completion() {
    let backend = Arc::new(FakeBackend::happy(
        quote_fixture(100.0, 561.37),
        completion_fixture(100.0, "token-sig-1"),
    ));
    let wallet = Arc::new(FakeWallet::cooperative("fee-sig-1"));
    let chain = Arc::new(FakeChain::timing_out());
    let orch = orchestrator(Arc::clone(&backend), wallet, chain);

    let err = orch.execute(request()).await.unwrap_err();

    match &err {
        ClaimError::FeeConfirmationTimeout { signature, timeout } => {
            assert_eq!(signature, &TxSignature::new("fee-sig-1"));
            assert_eq!(*timeout, ms(50));
        }
        other => panic!("expected FeeConfirmationTimeout, got {other:?}"),
    }
    assert!(err.is_retryable());
    assert_eq!(err.signature().unwrap().as_str(), "fee-sig-1");
    assert!(backend.completion_signatures().is_empty());
}

#[tokio::test]
async fn fee_transaction_failing_on_chain_charges_nothing() {
    let backend = Arc::new(FakeBackend::happy(
        quote_fixture(100.0, 561.37),
        completion_fixture(100.0, "token-sig-1"),
    ));
    let wallet = Arc::new(FakeWallet::cooperative("fee-sig-1"));
    let chain = Arc::new(FakeChain {
        behavior: ChainBehavior::FailOnChain("blockhash expired".to_string()),
        confirm_calls: std::sync::atomic::AtomicU32::new(0),
    });
    let orch = orchestrator(Arc::clone(&backend), wallet, chain);

    let err = orch.execute(request()).await.unwrap_err();

    assert!(matches!(err, ClaimError::FeeBroadcast(_)));
    assert!(!err.funds_moved());
    assert!(backend.completion_signatures().is_empty());
}

#[tokio::test]
async fn broadcast_without_gas_names_the_required_fee() {
    let backend = Arc::new(FakeBackend::happy(
        quote_fixture(100.0, 561.37),
        completion_fixture(100.0, "token-sig-1"),
    ));
    let mut wallet = FakeWallet::cooperative("unused");
    wallet.broadcast_behavior = BroadcastBehavior::InsufficientFunds;
    let chain = Arc::new(FakeChain::confirming());
    let orch = orchestrator(backend, Arc::new(wallet), chain);

    let err = orch.execute(request()).await.unwrap_err();

    match err {
        ClaimError::InsufficientGasFunds { required_sol } => {
            assert_eq!(required_sol, 0.0075);
        }
        other => panic!("expected InsufficientGasFunds, got {other:?}"),
    }
}

#[tokio::test]
async fn disconnected_wallet_fails_before_any_network_call() {
    let backend = Arc::new(FakeBackend::happy(
        quote_fixture(100.0, 561.37),
        completion_fixture(100.0, "token-sig-1"),
    ));
    let wallet = Arc::new(FakeWallet::disconnected());
    let chain = Arc::new(FakeChain::confirming());
    let orch = orchestrator(Arc::clone(&backend), wallet, chain);

    let err = orch.execute(request()).await.unwrap_err();

    assert!(matches!(err, ClaimError::WalletNotReady));
    assert_eq!(
        backend
            .initiate_calls
            .load(std::sync::atomic::Ordering::SeqCst),
        0
    );
}

#[tokio::test]
async fn failure_notifies_observers_with_a_terminal_error_phase() {
    let backend = Arc::new(FakeBackend::happy(
        quote_fixture(100.0, 561.37),
        completion_fixture(100.0, "token-sig-1"),
    ));
    let wallet = Arc::new(FakeWallet::rejecting());
    let chain = Arc::new(FakeChain::confirming());
    let orch = orchestrator(backend, wallet, chain);

    let (observer, mut updates) = ChannelObserver::new();
    orch.register_observer(observer);

    orch.execute(request()).await.unwrap_err();

    let mut seen = Vec::new();
    while let Ok(update) = updates.try_recv() {
        seen.push(update);
    }
    let last = seen.last().unwrap();
    assert_eq!(last.phase, ClaimPhase::Error);
    // The attempt keeps the percentage it reached before failing
    assert_eq!(last.percent, 25);
}

/// Backend whose quote call blocks until released, for overlap tests
struct GatedBackend {
    inner: FakeBackend,
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl BackendClient for GatedBackend {
    async fn initiate_claim(
        &self,
        wallet: &WalletAddress,
        amount: Option<f64>,
        pool_id: Option<PoolId>,
    ) -> Result<ClaimQuote, BackendError> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.initiate_claim(wallet, amount, pool_id).await
    }

    async fn complete_claim(
        &self,
        wallet: &WalletAddress,
        fee_signature: &TxSignature,
        pool_breakdown: &[PoolBreakdown],
    ) -> Result<ClaimCompletionResult, BackendError> {
        self.inner
            .complete_claim(wallet, fee_signature, pool_breakdown)
            .await
    }

    async fn claim_status(
        &self,
        token_signature: &TxSignature,
    ) -> Result<ClaimStatus, BackendError> {
        self.inner.claim_status(token_signature).await
    }

    async fn claim_history(
        &self,
        wallet: &WalletAddress,
    ) -> Result<Vec<ClaimHistoryItem>, BackendError> {
        self.inner.claim_history(wallet).await
    }
}

#[tokio::test]
async fn overlapping_attempts_are_refused() {
    init_tracing();
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let backend = Arc::new(GatedBackend {
        inner: FakeBackend::happy(
            quote_fixture(100.0, 561.37),
            completion_fixture(100.0, "token-sig-1"),
        ),
        entered: Arc::clone(&entered),
        release: Arc::clone(&release),
    });
    let wallet = Arc::new(FakeWallet::cooperative("fee-sig-1"));
    let chain = Arc::new(FakeChain::confirming());
    let orch = Arc::new(ClaimOrchestrator::new(
        test_config(),
        backend,
        wallet,
        chain,
    ));

    let first = {
        let orch = Arc::clone(&orch);
        tokio::spawn(async move { orch.execute(request()).await })
    };
    entered.notified().await;

    let err = orch.execute(request()).await.unwrap_err();
    assert!(matches!(err, ClaimError::AttemptInFlight));

    release.notify_one();
    let outcome = first.await.unwrap().unwrap();
    assert_eq!(outcome.confirmation, Confirmation::Confirmed);
}

#[tokio::test]
async fn fee_is_signed_broadcast_and_confirmed_exactly_once() {
    let backend = Arc::new(FakeBackend::happy(
        quote_fixture(100.0, 561.37),
        completion_fixture(100.0, "token-sig-1"),
    ));
    let wallet = Arc::new(FakeWallet::cooperative("fee-sig-1"));
    let chain = Arc::new(FakeChain::confirming());
    let orch = orchestrator(backend, Arc::clone(&wallet), Arc::clone(&chain));

    orch.execute(request()).await.unwrap();

    assert_eq!(
        wallet.sign_calls.load(std::sync::atomic::Ordering::SeqCst),
        1
    );
    assert_eq!(
        wallet
            .broadcast_calls
            .load(std::sync::atomic::Ordering::SeqCst),
        1
    );
    assert_eq!(
        chain
            .confirm_calls
            .load(std::sync::atomic::Ordering::SeqCst),
        1
    );
}
