//! Background Tasks Module
//!
//! Contains background tasks that run alongside a cache.
//!
//! # Tasks
//! - Sweeper: Removes expired cache entries at a fixed period

mod sweeper;

pub use sweeper::Sweeper;
