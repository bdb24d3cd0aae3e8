//! Cache provider trait for pluggable key-value backends with per-key TTL.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for TTL-capable key-value backends (Redis or in-memory).
///
/// Values are opaque strings. The provider is responsible for key prefixing
/// and TTL enforcement; it guarantees per-key atomicity of each call and
/// nothing across keys.
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value with a TTL, overwriting any previous value and TTL.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Delete a key. Deleting a missing key is a no-op.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a key exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Reset the TTL on an existing key. Returns `false` if the key is absent.
    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool>;

    /// Remaining lifetime of a key, or `None` if the key is absent.
    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>>;

    /// List live keys starting with `prefix` (prefix excluded from the
    /// provider's own global key prefix).
    async fn keys(&self, prefix: &str) -> AppResult<Vec<String>>;

    /// Check that the cache backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
