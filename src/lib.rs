//! TTL Cache - A generic in-memory expiring key/value cache
//!
//! Entries expire after a per-entry TTL. Expired entries are hidden from
//! lookups at once and freed by an optional background sweeper.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStats};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use tasks::Sweeper;
