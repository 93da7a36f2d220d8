//! Cache Entry Module
//!
//! Defines a stored value together with its expiry instant.

use std::time::Instant;

use chrono::TimeDelta;

// == Cache Entry ==
/// A single stored value and the instant after which it is stale.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Expiry instant, None = never expires
    pub expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry expiring `ttl` from now.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl` - Signed time-to-live. Zero means the entry never expires,
    ///   a negative TTL yields an entry that is already expired.
    pub fn new(value: V, ttl: TimeDelta) -> Self {
        Self {
            value,
            expires_at: expiry_from_ttl(Instant::now(), ttl),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Checks expiry against a caller-supplied instant.
    ///
    /// Boundary condition: the entry is expired only once `now` is strictly
    /// after its expiry instant. Entries without an expiry never expire.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => expires < now,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Converts a signed TTL into an expiry instant relative to `now`.
///
/// A positive TTL too large for the clock is treated as never expiring.
pub(crate) fn expiry_from_ttl(now: Instant, ttl: TimeDelta) -> Option<Instant> {
    if ttl.is_zero() {
        return None;
    }

    let magnitude = ttl.abs().to_std().ok()?;
    if ttl < TimeDelta::zero() {
        // Clocks near their epoch cannot go back that far; `now` is still stale
        // to any later check.
        Some(now.checked_sub(magnitude).unwrap_or(now))
    } else {
        now.checked_add(magnitude)
    }
}
