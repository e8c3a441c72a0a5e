//! Vestflow Orchestrator - the claim-with-fee saga
//!
//! Drives a single end-to-end claim across three remote parties:
//!
//! 1. request a quote and unsigned fee transaction from the backend
//! 2. have the wallet sign and broadcast the fee payment
//! 3. wait for chain confirmation under a hard timeout
//! 4. ask the backend to complete the claim, with bounded retry
//! 5. poll the claim status until the token transfer settles
//!
//! Failures map to a semantic taxonomy ([`ClaimError`]) that tells the
//! caller whether funds moved and whether the flow is safe to rerun.
//!
//! # Example
//!
//! ```rust,ignore
//! use vestflow_orchestrator::{ClaimOrchestrator, ClaimRequest, OrchestratorConfig};
//!
//! # async fn example(backend: std::sync::Arc<dyn vestflow_client::BackendClient>,
//! #                  wallet: std::sync::Arc<dyn vestflow_client::WalletSigner>,
//! #                  chain: std::sync::Arc<dyn vestflow_client::ChainClient>)
//! # -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = ClaimOrchestrator::new(OrchestratorConfig::new(), backend, wallet, chain);
//! let outcome = orchestrator
//!     .execute(ClaimRequest::new("9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin"))
//!     .await?;
//! println!("claimed {} ({})", outcome.completion.amount_claimed, outcome.fee_signature);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod attempt;
pub mod config;
pub mod error;
pub mod messages;
pub mod orchestrator;
pub mod phase;
pub mod progress;

// Re-exports for convenience
pub use attempt::ClaimAttempt;
pub use config::OrchestratorConfig;
pub use error::ClaimError;
pub use messages::friendly_message;
pub use orchestrator::{ClaimOrchestrator, ClaimOutcome, ClaimRequest, Confirmation};
pub use phase::{ClaimPhase, PhaseError};
pub use progress::{ChannelObserver, ProgressObserver, ProgressUpdate};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
