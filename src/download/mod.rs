//! Release asset download
//!
//! ## Module Organization
//!
//! - `retry` - Reusable retry wrapper and backoff policy
//! - `core` - Authenticated asset download and atomic file persistence

mod core;
mod retry;

// Re-export public API
pub use self::core::{AssetFetcher, FetchError, write_atomically};
pub use retry::{RetryPolicy, retry_async};
