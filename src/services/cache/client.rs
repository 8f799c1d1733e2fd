//! Cache client interface used by higher-level services (post listing cache).
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache-layer errors (transport/command/serialization).
///
/// Kept independent from `AppError` so callers decide how to fail
/// (the listing cache fails open and falls back to the store).
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    BackendConnection(String),
    #[error("cache command error: {0}")]
    BackendCommand(String),
    #[error("cache value error: {0}")]
    InvalidValue(String),
}

/// A minimal string cache with per-entry TTL.
///
/// Shared across concurrent requests as `Arc<dyn CacheClient>`.
#[async_trait]
pub trait CacheClient: Send + Sync + 'static {
    // Returns the cache backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // Get UTF-8 string value. Expired entries read as `None`.
    async fn get_string(&self, key: &str) -> CacheResult<Option<String>>;

    // Set (overwrite) value with TTL.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;
}
