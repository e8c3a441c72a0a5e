//! Request statistics
//!
//! Lightweight counters for monitoring the backend client. Read-only
//! snapshots; nothing here feeds back into behavior.

use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default, Clone)]
struct Counters {
    requests: u64,
    retries: u64,
    failures: u64,
    cache_hits: u64,
    cache_misses: u64,
}

/// Shared request counters
#[derive(Debug, Default, Clone)]
pub struct ClientStats {
    inner: Arc<Mutex<Counters>>,
}

impl ClientStats {
    /// Create zeroed stats
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_request(&self) {
        self.inner.lock().requests += 1;
    }

    pub(crate) fn record_retries(&self, count: u64) {
        self.inner.lock().retries += count;
    }

    pub(crate) fn record_failure(&self) {
        self.inner.lock().failures += 1;
    }

    pub(crate) fn record_cache_hit(&self) {
        self.inner.lock().cache_hits += 1;
    }

    pub(crate) fn record_cache_miss(&self) {
        self.inner.lock().cache_misses += 1;
    }

    /// Current counter values
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        let c = self.inner.lock().clone();
        StatsSnapshot {
            requests: c.requests,
            retries: c.retries,
            failures: c.failures,
            cache_hits: c.cache_hits,
            cache_misses: c.cache_misses,
        }
    }
}

/// Point-in-time view of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Requests issued (cache hits excluded)
    pub requests: u64,
    /// Transport-level retries
    pub retries: u64,
    /// Requests that ultimately failed
    pub failures: u64,
    /// Responses served from cache
    pub cache_hits: u64,
    /// Cache lookups that missed
    pub cache_misses: u64,
}
