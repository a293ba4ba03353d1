//! Page cache port.

use async_trait::async_trait;
use std::time::Duration;

/// String store with per-entry expiry, used for rendered pages.
///
/// An entry stored with a TTL must be reported absent from the instant
/// `stored_at + ttl` is reached. Backends decide whose clock measures that.
#[async_trait]
pub trait Cache: Send + Sync {
    /// The live entry under `key`. Backend failures read as a miss.
    async fn get(&self, key: &str) -> Option<String>;

    /// Store `value`, replacing any previous entry. `None` keeps it until deleted.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    async fn exists(&self, key: &str) -> bool;
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache backend unreachable: {0}")]
    Connection(String),

    #[error("Cache operation failed: {0}")]
    Operation(String),
}
