//! Cache Store Module
//!
//! Thread-safe map of keys to expiring entries behind a single reader/writer lock.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Instant;

use chrono::TimeDelta;
use parking_lot::RwLock;

use crate::cache::stats::StatsCounters;
use crate::cache::{CacheEntry, CacheStats, Entries};

// == Cache Store ==
/// Key/value storage with TTL semantics.
///
/// Reads (`get`, `keys`, `len`, `size`, `entries`) take the read lock and
/// never modify the map. Expired entries stay in place until a sweep pass
/// or an overwriting insert removes them, so `size()` can exceed `len()`.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-value storage
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    /// TTL applied by `add`
    default_ttl: TimeDelta,
    /// Lookup and sweep counters
    stats: StatsCounters,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash,
{
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `default_ttl` - TTL used by `add`; zero means entries never expire
    pub fn new(default_ttl: TimeDelta) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
            stats: StatsCounters::default(),
        }
    }

    /// Returns the TTL applied by `add`.
    pub fn default_ttl(&self) -> TimeDelta {
        self.default_ttl
    }

    // == Add ==
    /// Inserts or replaces `key` using the default TTL.
    pub fn add(&self, key: K, value: V) {
        self.add_with_expiry(key, value, self.default_ttl);
    }

    /// Inserts or replaces `key` with an explicit TTL.
    ///
    /// A zero TTL never expires. A negative TTL stores an entry that is
    /// already expired; it is invisible to `get` but counted by `size`
    /// until swept.
    pub fn add_with_expiry(&self, key: K, value: V, ttl: TimeDelta) {
        let entry = CacheEntry::new(value, ttl);
        self.entries.write().insert(key, entry);
    }

    // == Get ==
    /// Returns a copy of the value for `key` if present and not expired.
    ///
    /// An expired entry is reported as absent but left in the map.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let value = {
            let entries = self.entries.read();
            entries
                .get(key)
                .filter(|entry| !entry.is_expired())
                .map(|entry| entry.value.clone())
        };

        match value {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        value
    }

    // == Keys ==
    /// Returns every stored key, including expired-but-unswept ones.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.entries.read().keys().cloned().collect()
    }

    // == Length ==
    /// Returns the number of entries that have not expired.
    ///
    /// Scans the whole map.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .values()
            .filter(|entry| !entry.is_expired_at(now))
            .count()
    }

    /// Returns true if no live entries remain.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the raw number of stored entries, expired ones included.
    pub fn size(&self) -> usize {
        self.entries.read().len()
    }

    // == Entries ==
    /// Returns a read-locked view over the live entries.
    ///
    /// The read lock is held until the view is dropped. Calling any other
    /// method of this store while the view is alive may deadlock.
    pub fn entries(&self) -> Entries<'_, K, V> {
        Entries::new(self.entries.read())
    }

    // == Stats ==
    /// Returns a snapshot of the lookup counters and entry counts.
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.entries.read();
        let live = entries
            .values()
            .filter(|entry| !entry.is_expired_at(now))
            .count();
        self.stats.snapshot(live, entries.len())
    }

    // == Sweep ==
    /// Removes every expired entry, waiting for the write lock.
    ///
    /// Returns the number of entries removed.
    #[cfg(test)]
    pub(crate) fn sweep(&self) -> usize {
        let mut entries = self.entries.write();
        self.remove_expired(&mut entries)
    }

    /// Removes every expired entry if the write lock is free right now.
    ///
    /// Returns None without waiting when a reader or writer holds the lock,
    /// so an async caller never parks its worker thread here.
    pub(crate) fn try_sweep(&self) -> Option<usize> {
        let mut entries = self.entries.try_write()?;
        Some(self.remove_expired(&mut entries))
    }

    fn remove_expired(&self, entries: &mut HashMap<K, CacheEntry<V>>) -> usize {
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - entries.len();

        self.stats.record_swept(removed);
        removed
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    fn new_store() -> CacheStore<String, String> {
        CacheStore::new(TimeDelta::hours(1))
    }

    #[test]
    fn test_store_new() {
        let store = new_store();
        assert_eq!(store.len(), 0);
        assert_eq!(store.size(), 0);
        assert!(store.is_empty());
        assert_eq!(store.default_ttl(), TimeDelta::hours(1));
    }

    #[test]
    fn test_store_add_and_get() {
        let store = new_store();

        store.add("key1".to_string(), "value1".to_string());

        assert_eq!(store.get("key1"), Some("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let store = new_store();
        assert_eq!(store.get("nonexistent"), None);
    }

    #[test]
    fn test_store_overwrite() {
        let store = new_store();

        store.add("key1".to_string(), "value1".to_string());
        store.add("key1".to_string(), "value2".to_string());

        assert_eq!(store.get("key1"), Some("value2".to_string()));
        assert_eq!(store.len(), 1);
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn test_store_overwrite_replaces_expiry() {
        let store = new_store();

        store.add_with_expiry("key1".to_string(), "stale".to_string(), TimeDelta::seconds(-1));
        assert_eq!(store.get("key1"), None);

        store.add("key1".to_string(), "fresh".to_string());
        assert_eq!(store.get("key1"), Some("fresh".to_string()));
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn test_store_ttl_expiration_is_lazy() {
        let store = new_store();

        store.add_with_expiry("key1".to_string(), "value1".to_string(), TimeDelta::milliseconds(50));
        assert_eq!(store.get("key1"), Some("value1".to_string()));

        sleep(Duration::from_millis(120));

        assert_eq!(store.get("key1"), None);
        // Still stored until swept
        assert_eq!(store.size(), 1);
        assert_eq!(store.len(), 0);
        assert_eq!(store.keys(), vec!["key1".to_string()]);
    }

    #[test]
    fn test_store_zero_ttl_never_expires() {
        let store = CacheStore::new(TimeDelta::milliseconds(10));

        store.add_with_expiry("forever", 1, TimeDelta::zero());
        store.add("short", 2);

        sleep(Duration::from_millis(50));

        assert_eq!(store.get("forever"), Some(1));
        assert_eq!(store.get("short"), None);
    }

    #[test]
    fn test_store_negative_ttl() {
        let store = new_store();

        store.add_with_expiry("key1".to_string(), "value1".to_string(), TimeDelta::seconds(-5));

        assert_eq!(store.get("key1"), None);
        assert_eq!(store.len(), 0);
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn test_store_sweep() {
        let store = new_store();

        store.add_with_expiry("gone1".to_string(), "v".to_string(), TimeDelta::seconds(-1));
        store.add_with_expiry("gone2".to_string(), "v".to_string(), TimeDelta::seconds(-1));
        store.add_with_expiry("kept".to_string(), "v".to_string(), TimeDelta::seconds(10));
        store.add_with_expiry("forever".to_string(), "v".to_string(), TimeDelta::zero());

        let live_before = store.len();
        let removed = store.sweep();

        assert_eq!(removed, 2);
        assert_eq!(store.size(), 2);
        assert_eq!(store.len(), live_before);
        assert!(store.get("kept").is_some());
        assert!(store.get("forever").is_some());
    }

    #[test]
    fn test_store_sweep_empty() {
        let store = new_store();
        assert_eq!(store.sweep(), 0);
    }

    #[test]
    fn test_store_try_sweep_skips_while_view_held() {
        let store = new_store();
        store.add_with_expiry("gone".to_string(), "v".to_string(), TimeDelta::seconds(-1));
        store.add("kept".to_string(), "v".to_string());

        let entries = store.entries();
        assert_eq!(store.try_sweep(), None);
        assert_eq!(entries.iter().count(), 1);
        drop(entries);

        assert_eq!(store.size(), 2);
        assert_eq!(store.try_sweep(), Some(1));
        assert_eq!(store.size(), 1);
        assert_eq!(store.stats().swept, 1);
    }

    #[test]
    fn test_store_keys() {
        let store = new_store();

        store.add("a".to_string(), "1".to_string());
        store.add("b".to_string(), "2".to_string());
        store.add_with_expiry("c".to_string(), "3".to_string(), TimeDelta::seconds(-1));

        let mut keys = store.keys();
        keys.sort();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_store_entries_skips_expired() {
        let store = new_store();

        store.add("a".to_string(), "1".to_string());
        store.add("b".to_string(), "2".to_string());
        store.add_with_expiry("c".to_string(), "3".to_string(), TimeDelta::seconds(-1));

        let entries = store.entries();
        let mut pairs: Vec<(String, String)> = entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        pairs.sort();

        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_store_entries_restartable() {
        let store = new_store();
        store.add("a".to_string(), "1".to_string());
        store.add("b".to_string(), "2".to_string());

        let entries = store.entries();
        assert_eq!(entries.iter().count(), 2);
        // Early stop, then a fresh pass over the same view
        assert_eq!(entries.iter().take(1).count(), 1);
        assert_eq!(entries.iter().count(), 2);
        drop(entries);

        assert_eq!(store.entries().iter().count(), 2);
    }

    #[test]
    fn test_store_stats() {
        let store = new_store();

        store.add("key1".to_string(), "value1".to_string());
        store.add_with_expiry("old".to_string(), "v".to_string(), TimeDelta::seconds(-1));
        store.get("key1"); // hit
        store.get("old"); // miss
        store.get("nonexistent"); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.live_entries, 1);
        assert_eq!(stats.total_entries, 2);

        store.sweep();
        let stats = store.stats();
        assert_eq!(stats.swept, 1);
        assert_eq!(stats.total_entries, 1);
    }
}
