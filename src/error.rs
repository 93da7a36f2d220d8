//! Error types for the cache
//!
//! Lookups never fail: a missing or expired key is an ordinary `None`. The
//! only error is constructing a background sweeper without a runtime.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A non-zero cleanup period was requested outside a Tokio runtime
    #[error("background sweeping requires a Tokio runtime; use a zero cleanup period or construct the cache inside a runtime")]
    NoRuntime,
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
