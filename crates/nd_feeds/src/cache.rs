use chrono::{DateTime, Duration, Utc};
use nd_core::Clock;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex as TokioMutex;

type CacheKey = Vec<String>;

struct CacheEntry<V> {
    generation: u64,
    stored_at: DateTime<Utc>,
    value: Arc<V>,
}

/// Time-bounded memo of aggregation results keyed by the ordered keyword list.
///
/// Entries expire after `ttl` or as soon as the generation token moves on,
/// and dead entries are swept whenever a fresh result is stored. Callers for
/// the same key are serialized so a miss is usually fetched once; a fetch
/// that straddles an invalidation is handed to its caller but not stored.
pub struct AggregationCache<V> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    generation: AtomicU64,
    entries: TokioMutex<HashMap<CacheKey, CacheEntry<V>>>,
    /// Only keys with a caller in flight.
    key_locks: TokioMutex<HashMap<CacheKey, Arc<TokioMutex<()>>>>,
}

impl<V> AggregationCache<V> {
    pub fn new(ttl: std::time::Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl: Duration::from_std(ttl).unwrap_or(Duration::MAX),
            clock,
            generation: AtomicU64::new(0),
            entries: TokioMutex::new(HashMap::new()),
            key_locks: TokioMutex::new(HashMap::new()),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Returns the live entry for `key`, dropping it if it has gone stale.
    pub async fn get(&self, key: &[String]) -> Option<Arc<V>> {
        let generation = self.generation();
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;

        let fresh = match entries.get(key) {
            Some(entry) => self.is_live(entry, generation, now),
            None => return None,
        };
        if fresh {
            entries.get(key).map(|e| e.value.clone())
        } else {
            entries.remove(key);
            None
        }
    }

    /// Serves `key` from the cache or runs `fetch` with the generation the
    /// result will be stored under.
    pub async fn get_or_fetch<F, Fut>(&self, key: &[String], fetch: F) -> Arc<V>
    where
        F: FnOnce(u64) -> Fut,
        Fut: Future<Output = V>,
    {
        let key_lock = self.key_lock(key).await;
        let guard = key_lock.lock().await;

        let value = match self.get(key).await {
            Some(value) => {
                tracing::debug!("🎯 cache hit for {:?}", key);
                value
            }
            None => {
                tracing::debug!("🔄 cache miss for {:?}", key);
                let generation = self.generation();
                let value = Arc::new(fetch(generation).await);
                if generation == self.generation() {
                    self.insert(key, generation, value.clone()).await;
                } else {
                    tracing::debug!("⏭️ not storing {:?}, cache was invalidated mid-fetch", key);
                }
                value
            }
        };

        drop(guard);
        drop(key_lock);
        self.release_key_locks().await;
        value
    }

    fn is_live(&self, entry: &CacheEntry<V>, generation: u64, now: DateTime<Utc>) -> bool {
        entry.generation == generation && now - entry.stored_at < self.ttl
    }

    /// Stores `value` and drops every entry that can no longer be served.
    async fn insert(&self, key: &[String], generation: u64, value: Arc<V>) {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;
        entries.retain(|_, entry| self.is_live(entry, generation, now));
        entries.insert(
            key.to_vec(),
            CacheEntry {
                generation,
                stored_at: now,
                value,
            },
        );
    }

    async fn key_lock(&self, key: &[String]) -> Arc<TokioMutex<()>> {
        self.key_locks
            .lock()
            .await
            .entry(key.to_vec())
            .or_insert_with(|| Arc::new(TokioMutex::new(())))
            .clone()
    }

    /// Forgets locks nobody holds a handle to. Handles are only cloned under
    /// the map lock, so a count of one means no caller is waiting on it.
    async fn release_key_locks(&self) {
        self.key_locks.lock().await.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    /// Advances the generation token and drops every stored entry.
    pub async fn invalidate(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.entries.lock().await.clear();
        self.key_locks.lock().await.clear();
        tracing::debug!("🧹 cache invalidated, generation {}", generation);
        generation
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
