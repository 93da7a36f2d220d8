//! Live Entry Iteration
//!
//! A read-locked view over a store that lazily yields non-expired entries.

use std::collections::hash_map;
use std::collections::HashMap;
use std::iter::FusedIterator;

use parking_lot::RwLockReadGuard;

use crate::cache::CacheEntry;

// == Entries ==
/// Read-locked view over the live entries of a cache.
///
/// The store's read lock is held for as long as this value exists. Writers
/// block until it is dropped, and calling back into the same cache from
/// inside an iteration may deadlock. Keep the view short-lived.
///
/// Each call to [`Entries::iter`] starts a fresh pass; iteration order is
/// unspecified.
pub struct Entries<'a, K, V> {
    guard: RwLockReadGuard<'a, HashMap<K, CacheEntry<V>>>,
}

impl<'a, K, V> Entries<'a, K, V> {
    pub(crate) fn new(guard: RwLockReadGuard<'a, HashMap<K, CacheEntry<V>>>) -> Self {
        Self { guard }
    }

    /// Returns an iterator over `(key, value)` pairs that have not expired.
    ///
    /// Expiry is checked as each entry is reached.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.guard.iter(),
        }
    }
}

impl<'g, 'a, K, V> IntoIterator for &'g Entries<'a, K, V> {
    type Item = (&'g K, &'g V);
    type IntoIter = Iter<'g, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// == Iter ==
/// Iterator over live entries, created by [`Entries::iter`].
pub struct Iter<'g, K, V> {
    inner: hash_map::Iter<'g, K, CacheEntry<V>>,
}

impl<'g, K, V> Iterator for Iter<'g, K, V> {
    type Item = (&'g K, &'g V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .by_ref()
            .find(|(_, entry)| !entry.is_expired())
            .map(|(key, entry)| (key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
