//! Cache Handle Module
//!
//! Public façade composing a store with an optional background sweeper.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use tracing::debug;

use crate::cache::{CacheStats, CacheStore, Entries};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::tasks::Sweeper;

// == Cache ==
/// Concurrency-safe expiring key/value cache.
///
/// Entries expire `default_ttl` after insertion unless added with an explicit
/// TTL. Expired entries are hidden from lookups immediately but only freed
/// by a sweep pass. With a non-zero cleanup period a background task sweeps
/// on that period; with a zero period nothing is ever swept and memory grows
/// with the number of distinct keys.
///
/// The sweeper is stopped when the cache is dropped or closed. Share a cache
/// between threads with `Arc<Cache<K, V>>`.
///
/// # Example
/// ```
/// use chrono::TimeDelta;
/// use std::time::Duration;
/// use ttl_cache::Cache;
///
/// let cache = Cache::new(TimeDelta::hours(1), Duration::ZERO).unwrap();
/// cache.add("foo", "bar");
/// assert_eq!(cache.get("foo"), Some("bar"));
/// ```
#[derive(Debug)]
pub struct Cache<K, V> {
    store: Arc<CacheStore<K, V>>,
    sweeper: Option<Sweeper>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a cache.
    ///
    /// # Arguments
    /// * `default_ttl` - TTL used by `add`; zero means entries never expire
    /// * `cleanup_period` - Interval between background sweeps; zero disables sweeping
    ///
    /// # Errors
    /// Returns `CacheError::NoRuntime` if `cleanup_period` is non-zero and no
    /// Tokio runtime is available to run the sweeper.
    pub fn new(default_ttl: TimeDelta, cleanup_period: Duration) -> Result<Self> {
        let store = Arc::new(CacheStore::new(default_ttl));

        let sweeper = if cleanup_period.is_zero() {
            None
        } else {
            Some(Sweeper::spawn(Arc::downgrade(&store), cleanup_period)?)
        };

        debug!(
            "Cache created: default_ttl={}, cleanup_period={:?}",
            default_ttl, cleanup_period
        );

        Ok(Self { store, sweeper })
    }

    /// Creates a cache from a [`CacheConfig`].
    pub fn with_config(config: &CacheConfig) -> Result<Self> {
        Self::new(config.default_ttl, config.cleanup_period)
    }
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash,
{
    // == Add ==
    /// Inserts or replaces `key` using the default TTL.
    pub fn add(&self, key: K, value: V) {
        self.store.add(key, value);
    }

    /// Inserts or replaces `key` with an explicit TTL.
    ///
    /// Zero never expires; a negative TTL stores an already-expired entry.
    pub fn add_with_expiry(&self, key: K, value: V, ttl: TimeDelta) {
        self.store.add_with_expiry(key, value, ttl);
    }

    // == Get ==
    /// Returns a copy of the value for `key`, or None if absent or expired.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.store.get(key)
    }

    /// Returns every stored key, including expired entries not yet swept.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.store.keys()
    }

    /// Returns the number of live entries. Scans the whole cache.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns true if no live entries remain.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns the number of stored entries, expired ones included.
    pub fn size(&self) -> usize {
        self.store.size()
    }

    /// Returns a read-locked view for iterating live entries.
    ///
    /// Holds the read lock until dropped: do not call back into this cache
    /// while the view is alive.
    pub fn entries(&self) -> Entries<'_, K, V> {
        self.store.entries()
    }

    /// Returns a statistics snapshot.
    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }

    /// Returns the TTL applied by `add`.
    pub fn default_ttl(&self) -> TimeDelta {
        self.store.default_ttl()
    }

    /// Returns the background sweeper, if one is running.
    pub fn sweeper(&self) -> Option<&Sweeper> {
        self.sweeper.as_ref()
    }
}

impl<K, V> Cache<K, V> {
    // == Close ==
    /// Stops the background sweeper and releases the cache.
    ///
    /// Equivalent to dropping the cache.
    pub fn close(mut self) {
        self.stop_sweeper();
    }

    fn stop_sweeper(&mut self) {
        if let Some(mut sweeper) = self.sweeper.take() {
            sweeper.stop();
        }
    }
}

impl<K, V> Drop for Cache<K, V> {
    fn drop(&mut self) {
        self.stop_sweeper();
    }
}
