//! Wallet signing seam
//!
//! The wallet adapter is external to this workspace; the orchestrator only
//! needs sign-then-broadcast over opaque transaction bytes.

use crate::error::WalletError;
use async_trait::async_trait;
use vestflow_types::TxSignature;

/// Serialized transaction awaiting a signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction(pub Vec<u8>);

impl UnsignedTransaction {
    /// Wrap serialized transaction bytes
    #[inline]
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Borrow the raw bytes
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Serialized signed transaction ready to broadcast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction(pub Vec<u8>);

impl SignedTransaction {
    /// Wrap serialized signed bytes
    #[inline]
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Borrow the raw bytes
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Transaction signing and broadcasting capability
///
/// Implementations may prompt a user; `sign` rejecting with
/// [`WalletError::Rejected`] means the user declined and the caller must not
/// retry automatically. Neither method silently no-ops.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Whether a connected wallet capable of signing is available
    ///
    /// Checked before any network call is made; a not-ready wallet fails the
    /// claim with no partial state.
    fn is_ready(&self) -> bool;

    /// Request a signature over the transaction
    async fn sign(&self, tx: &UnsignedTransaction) -> Result<SignedTransaction, WalletError>;

    /// Broadcast a signed transaction, returning its signature
    async fn broadcast(&self, tx: &SignedTransaction) -> Result<TxSignature, WalletError>;
}
