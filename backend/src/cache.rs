//! Process-wide load-once caches
//!
//! A `Memo` holds a single lazily loaded value. Entries live until they are
//! invalidated or, when a TTL is configured, until they expire.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

struct Cached<T> {
    value: Arc<T>,
    loaded_at: Instant,
}

/// Single-slot memoizing cache with optional expiry
pub struct Memo<T> {
    name: &'static str,
    ttl: Option<Duration>,
    slot: RwLock<Option<Cached<T>>>,
}

impl<T> Memo<T> {
    /// Create an empty cache; `ttl = None` keeps the value until invalidated
    pub fn new(name: &'static str, ttl: Option<Duration>) -> Self {
        Self {
            name,
            ttl,
            slot: RwLock::new(None),
        }
    }

    fn is_fresh(&self, cached: &Cached<T>) -> bool {
        match self.ttl {
            Some(ttl) => cached.loaded_at.elapsed() < ttl,
            None => true,
        }
    }

    /// Return the cached value, running `load` if the slot is empty or stale
    ///
    /// Concurrent callers that miss wait for a single load.
    pub async fn get_or_load<F, Fut>(&self, load: F) -> Arc<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        {
            let slot = self.slot.read().await;
            if let Some(cached) = slot.as_ref().filter(|c| self.is_fresh(c)) {
                return Arc::clone(&cached.value);
            }
        }

        let mut slot = self.slot.write().await;
        // Another task may have filled the slot while we waited for the lock
        if let Some(cached) = slot.as_ref().filter(|c| self.is_fresh(c)) {
            return Arc::clone(&cached.value);
        }

        tracing::debug!(cache = self.name, "Cache miss, loading");
        let value = Arc::new(load().await);
        *slot = Some(Cached {
            value: Arc::clone(&value),
            loaded_at: Instant::now(),
        });
        value
    }

    /// Current value without loading, if present and fresh
    pub async fn peek(&self) -> Option<Arc<T>> {
        let slot = self.slot.read().await;
        slot.as_ref()
            .filter(|c| self.is_fresh(c))
            .map(|c| Arc::clone(&c.value))
    }

    /// Drop the cached value so the next `get_or_load` reloads
    pub async fn invalidate(&self) {
        tracing::debug!(cache = self.name, "Cache invalidated");
        *self.slot.write().await = None;
    }
}
