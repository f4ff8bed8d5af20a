//! Time-to-live cache in front of an unreliable lookup.
//!
//! Entries expire lazily: freshness is checked on read and nothing sweeps the
//! map in the background. A failed fetch never stores anything, so the next
//! call retries.

use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

/// Ten minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) < ttl
    }
}

/// At most one entry per key.
///
/// The lock is released while `fetch` runs, so two concurrent misses on the
/// same key both fetch; the later success overwrites the earlier one.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> Default for TtlCache<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key` if it is younger than `ttl`,
    /// otherwise await `fetch`. On failure the error goes to `fallback` and
    /// its result is returned uncached.
    pub async fn get<F, Fut, E>(
        &self,
        key: K,
        ttl: Duration,
        fetch: F,
        fallback: impl FnOnce(E) -> V,
    ) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: Display,
    {
        if let Some(value) = self.fresh(&key, ttl).await {
            tracing::trace!("Cache hit for {:?}", key);
            return value;
        }

        match fetch().await {
            Ok(value) => {
                let entry = CacheEntry {
                    value: value.clone(),
                    stored_at: Instant::now(),
                };
                self.entries.write().await.insert(key, entry);
                value
            }
            Err(e) => {
                tracing::warn!("Lookup for {:?} failed, serving fallback: {}", key, e);
                fallback(e)
            }
        }
    }

    async fn fresh(&self, key: &K, ttl: Duration) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_fresh(ttl, Instant::now()))
            .map(|entry| entry.value.clone())
    }

    /// Number of stored entries, fresh or stale.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
