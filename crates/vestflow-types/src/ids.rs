//! Identifier newtypes
//!
//! String-backed identifiers for the external parties (wallets, chain
//! signatures, backend pool records) and a ULID for claim attempts.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Wallet address (base58 public key, opaque to this client)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(pub String);

impl WalletAddress {
    /// Create from any string-like value
    #[inline]
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    /// Borrow as str
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WalletAddress {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Chain transaction signature
///
/// Identifies either the user-paid fee transaction or the backend-submitted
/// token transfer. Once the chain confirms the transaction behind it, the
/// signature is the immutable reconciliation key for the attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxSignature(pub String);

impl TxSignature {
    /// Create from any string-like value
    #[inline]
    pub fn new(sig: impl Into<String>) -> Self {
        Self(sig.into())
    }

    /// Borrow as str
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TxSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TxSignature {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Vesting pool identifier (backend-managed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolId(pub String);

impl PoolId {
    /// Create from any string-like value
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for PoolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Vesting record identifier within a pool
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VestingRecordId(pub String);

impl VestingRecordId {
    /// Create from any string-like value
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for VestingRecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique claim attempt identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AttemptId(pub Ulid);

impl AttemptId {
    /// Generate new attempt ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for AttemptId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AttemptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
