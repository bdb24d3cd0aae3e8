//! In-memory cache implementation using the moka crate.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use tracing::debug;

use adminhub_core::config::cache::MemoryCacheConfig;
use adminhub_core::result::AppResult;
use adminhub_core::traits::cache::CacheProvider;

/// A stored value together with its absolute deadline.
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn new(value: String, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn remaining(&self) -> Option<Duration> {
        let remaining = self.expires_at.saturating_duration_since(Instant::now());
        (!remaining.is_zero()).then_some(remaining)
    }
}

/// Derives each entry's moka lifetime from its stored deadline, so
/// per-key TTLs and `expire` resets are honored by eviction.
struct DeadlineExpiry;

impl Expiry<String, Entry> for DeadlineExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Entry,
        created_at: Instant,
    ) -> Option<Duration> {
        Some(value.expires_at.saturating_duration_since(created_at))
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.expires_at.saturating_duration_since(updated_at))
    }
}

/// In-memory cache provider using moka.
///
/// Suitable for single-node deployments and tests. The cache is built
/// without a capacity bound, so an entry is only ever removed by its own
/// deadline or an explicit delete.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    /// The underlying moka cache.
    cache: Cache<String, Entry>,
}

impl MemoryCacheProvider {
    /// Create a new in-memory cache from configuration.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let cache = Cache::builder()
            .initial_capacity(config.initial_capacity)
            .expire_after(DeadlineExpiry)
            .build();

        Self { cache }
    }

    async fn live_entry(&self, key: &str) -> Option<Entry> {
        self.cache
            .get(key)
            .await
            .filter(|entry| entry.remaining().is_some())
    }
}

impl Default for MemoryCacheProvider {
    fn default() -> Self {
        Self::new(&MemoryCacheConfig::default())
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.live_entry(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.cache
            .insert(key.to_string(), Entry::new(value.to_string(), ttl))
            .await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.cache.invalidate(key).await;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.live_entry(key).await.is_some())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        // Compute under the entry lock so a concurrent delete cannot be undone.
        let result = self
            .cache
            .entry(key.to_string())
            .and_compute_with(|current| {
                let op = match current {
                    Some(entry) if entry.value().remaining().is_some() => {
                        Op::Put(Entry::new(entry.into_value().value, ttl))
                    }
                    _ => Op::Nop,
                };
                std::future::ready(op)
            })
            .await;

        Ok(matches!(result, CompResult::ReplacedWith(_)))
    }

    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        Ok(self.live_entry(key).await.and_then(|entry| entry.remaining()))
    }

    async fn keys(&self, prefix: &str) -> AppResult<Vec<String>> {
        let keys: Vec<String> = self
            .cache
            .iter()
            .filter(|(key, entry)| key.starts_with(prefix) && entry.remaining().is_some())
            .map(|(key, _)| key.to_string())
            .collect();

        debug!(prefix, count = keys.len(), "Listed keys by prefix");
        Ok(keys)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
