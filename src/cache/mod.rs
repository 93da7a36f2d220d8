//! Cache Module
//!
//! Provides an in-memory key/value cache with TTL expiration and
//! background sweeping of expired entries.

mod entry;
mod handle;
mod iter;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use handle::Cache;
pub use iter::{Entries, Iter};
pub use stats::CacheStats;
pub use store::CacheStore;
