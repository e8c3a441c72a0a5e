//! Response cache
//!
//! In-memory TTL cache for GET responses, keyed `"{wallet}:{path}"` so a
//! wallet switch never serves another wallet's data. Values are stored as
//! JSON and re-deserialized on hit; only read-mostly list endpoints opt in.

use moka::future::Cache;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// TTL cache over JSON values
#[derive(Debug, Clone)]
pub struct ResponseCache {
    inner: Cache<String, serde_json::Value>,
}

impl ResponseCache {
    /// Create a cache with the given capacity and TTL
    #[must_use]
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self {
            // Closure invalidation must be opted into at build time or
            // invalidate_entries_if is rejected at runtime
            inner: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .support_invalidation_closures()
                .build(),
        }
    }

    /// Cache key for a wallet-scoped path
    #[must_use]
    pub fn key(wallet: &str, path: &str) -> String {
        format!("{wallet}:{path}")
    }

    /// Fetch and deserialize a cached value
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.inner.get(key).await?;
        serde_json::from_value(value).ok()
    }

    /// Store a value
    pub async fn insert<T: Serialize>(&self, key: String, value: &T) {
        if let Ok(json) = serde_json::to_value(value) {
            self.inner.insert(key, json).await;
        }
    }

    /// Drop every entry for a wallet (used on wallet change and after a
    /// successful claim, when cached lists go stale)
    pub async fn invalidate_wallet(&self, wallet: &str) {
        let prefix = format!("{wallet}:");
        // Invalidation runs lazily inside moka; reads check the predicate
        if let Err(error) = self
            .inner
            .invalidate_entries_if(move |key, _| key.starts_with(&prefix))
        {
            tracing::warn!(wallet, %error, "cache invalidation rejected");
        }
    }

    /// Entry count (approximate, for diagnostics)
    #[must_use]
    pub fn len(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Whether the cache is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
