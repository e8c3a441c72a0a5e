//! Vestflow Client - Collaborator seams and transport
//!
//! Provides the three external capabilities the claim orchestrator consumes:
//! - [`BackendClient`] - the vesting backend REST API (with an HTTP
//!   implementation, response caching, and transport-level retry for GETs)
//! - [`WalletSigner`] - transaction signing and broadcasting (interface only;
//!   the wallet adapter lives outside this workspace)
//! - [`ChainClient`] - transaction confirmation against an RPC node
//!
//! Retry/backoff plumbing lives here so both the transport layer and the
//! orchestrator share one implementation.

#![warn(unreachable_pub)]

pub mod backend;
pub mod cache;
pub mod chain;
pub mod config;
pub mod error;
pub mod retry;
pub mod stats;
pub mod wallet;

// Re-exports for convenience
pub use backend::{BackendClient, HttpBackendClient};
pub use chain::{ChainClient, Commitment, RpcChainClient};
pub use config::{ClientConfig, ConfigError, RpcConfig};
pub use error::{BackendError, ChainError, WalletError};
pub use retry::{poll_until, retry_with_backoff, PollOutcome, PollPolicy, RetryExhausted, RetryPolicy};
pub use stats::{ClientStats, StatsSnapshot};
pub use wallet::{SignedTransaction, UnsignedTransaction, WalletSigner};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
