//! Vestflow Types - Claim domain model
//!
//! Defines the value objects exchanged during a claim attempt:
//! - Identifier newtypes (wallets, signatures, pools, attempts)
//! - Claim quotes and their invariants
//! - Completion results and status reports
//! - Wire DTOs matching the backend's JSON contracts

#![warn(unreachable_pub)]

pub mod completion;
pub mod ids;
pub mod quote;
pub mod wire;

// Re-exports for convenience
pub use completion::{ClaimCompletionResult, ClaimHistoryItem, ClaimStatus};
pub use ids::{AttemptId, PoolId, TxSignature, VestingRecordId, WalletAddress};
pub use quote::{ClaimQuote, FeeDetails, PoolBreakdown, QuoteValidationError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
