//! Namespaced session store over the configured cache backend.
//!
//! Every call is bounded by a deadline; a timeout or backend failure
//! surfaces as `StoreUnavailable`, never as a credential rejection.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, warn};

use adminhub_cache::provider::CacheManager;
use adminhub_cache::Namespace;
use adminhub_core::error::{AppError, ErrorKind};
use adminhub_core::result::AppResult;
use adminhub_core::traits::CacheProvider;

use super::record::SessionRecord;

/// Put/Get/Delete/Extend over the three session namespaces.
#[derive(Debug, Clone)]
pub struct SessionStore {
    /// Backing key-value store.
    cache: Arc<CacheManager>,
    /// Deadline applied to each round-trip.
    timeout: Duration,
}

impl SessionStore {
    /// Creates a new session store.
    pub fn new(cache: Arc<CacheManager>, timeout: Duration) -> Self {
        Self { cache, timeout }
    }

    /// Writes `value` under `ns[key]`, replacing any value and TTL.
    pub async fn put(&self, ns: Namespace, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let full_key = ns.key(key);
        self.bounded("put", ns, self.cache.set(&full_key, value, ttl))
            .await
    }

    /// Reads `ns[key]`.
    pub async fn get(&self, ns: Namespace, key: &str) -> AppResult<Option<String>> {
        let full_key = ns.key(key);
        self.bounded("get", ns, self.cache.get(&full_key)).await
    }

    /// Deletes `ns[key]`; deleting a missing key is a no-op.
    pub async fn delete(&self, ns: Namespace, key: &str) -> AppResult<()> {
        let full_key = ns.key(key);
        self.bounded("delete", ns, self.cache.delete(&full_key))
            .await
    }

    /// Resets the TTL of `ns[key]`. Returns `false` if the key is gone.
    pub async fn extend(&self, ns: Namespace, key: &str, ttl: Duration) -> AppResult<bool> {
        let full_key = ns.key(key);
        self.bounded("extend", ns, self.cache.expire(&full_key, ttl))
            .await
    }

    /// Remaining lifetime of `ns[key]`.
    pub async fn ttl(&self, ns: Namespace, key: &str) -> AppResult<Option<Duration>> {
        let full_key = ns.key(key);
        self.bounded("ttl", ns, self.cache.ttl(&full_key)).await
    }

    /// Ids of all live keys in a namespace.
    pub async fn ids(&self, ns: Namespace) -> AppResult<Vec<String>> {
        let keys = self.bounded("scan", ns, self.cache.keys(ns.prefix())).await?;
        Ok(keys
            .iter()
            .filter_map(|key| ns.strip(key))
            .map(str::to_string)
            .collect())
    }

    /// Serializes and writes a session record under its access token id.
    pub async fn put_record(&self, record: &SessionRecord, ttl: Duration) -> AppResult<()> {
        let json = serde_json::to_string(record)?;
        self.put(Namespace::AccessSession, &record.access_token_id, &json, ttl)
            .await
    }

    /// Reads and deserializes a session record.
    ///
    /// An undecodable record is reported as an internal error rather than
    /// silently treated as absent.
    pub async fn get_record(&self, access_token_id: &str) -> AppResult<Option<SessionRecord>> {
        let Some(json) = self.get(Namespace::AccessSession, access_token_id).await? else {
            return Ok(None);
        };

        serde_json::from_str(&json).map(Some).map_err(|e| {
            error!(session_id = %access_token_id, error = %e, "Corrupt session record");
            AppError::with_source(ErrorKind::Internal, "Corrupt session record", e)
        })
    }

    /// Backend health check.
    pub async fn health_check(&self) -> AppResult<bool> {
        tokio::time::timeout(self.timeout, self.cache.health_check())
            .await
            .map_err(|_| AppError::store_unavailable("Session store health check timed out"))?
    }

    async fn bounded<T>(
        &self,
        op: &'static str,
        ns: Namespace,
        fut: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                error!(op, namespace = %ns, error = %e, "Session store call failed");
                Err(match e.kind {
                    ErrorKind::StoreUnavailable => e,
                    _ => AppError::store_unavailable(format!("Session store {op} failed: {e}")),
                })
            }
            Err(_) => {
                warn!(op, namespace = %ns, timeout_ms = self.timeout.as_millis() as u64, "Session store call timed out");
                Err(AppError::store_unavailable(format!(
                    "Session store {op} timed out"
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use adminhub_cache::memory::MemoryCacheProvider;

    use super::*;

    /// Backend whose every call outlives any reasonable deadline.
    #[derive(Debug)]
    struct StalledProvider;

    #[async_trait]
    impl CacheProvider for StalledProvider {
        async fn get(&self, _key: &str) -> AppResult<Option<String>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(None)
        }
        async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> AppResult<()> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }
        async fn delete(&self, _key: &str) -> AppResult<()> {
            Ok(())
        }
        async fn exists(&self, _key: &str) -> AppResult<bool> {
            Ok(false)
        }
        async fn expire(&self, _key: &str, _ttl: Duration) -> AppResult<bool> {
            Ok(false)
        }
        async fn ttl(&self, _key: &str) -> AppResult<Option<Duration>> {
            Ok(None)
        }
        async fn keys(&self, _prefix: &str) -> AppResult<Vec<String>> {
            Err(AppError::internal("connection reset"))
        }
        async fn health_check(&self) -> AppResult<bool> {
            Ok(false)
        }
    }

    fn memory_store() -> SessionStore {
        let cache = CacheManager::from_provider(Arc::new(MemoryCacheProvider::default()));
        SessionStore::new(Arc::new(cache), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let store = memory_store();
        let ttl = Duration::from_secs(60);
        store
            .put(Namespace::RefreshMapping, "id", "access-1", ttl)
            .await
            .unwrap();

        assert_eq!(store.get(Namespace::AccessSession, "id").await.unwrap(), None);
        assert_eq!(
            store.get(Namespace::RefreshMapping, "id").await.unwrap(),
            Some("access-1".to_string())
        );
        assert_eq!(
            store.ids(Namespace::RefreshMapping).await.unwrap(),
            vec!["id".to_string()]
        );
    }

    #[tokio::test]
    async fn test_extend_missing_key() {
        let store = memory_store();
        assert!(
            !store
                .extend(Namespace::AccessSession, "gone", Duration::from_secs(5))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_corrupt_record_is_internal_error() {
        let store = memory_store();
        store
            .put(Namespace::AccessSession, "bad", "{not json", Duration::from_secs(5))
            .await
            .unwrap();
        let err = store.get_record("bad").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_store_unavailable() {
        let cache = CacheManager::from_provider(Arc::new(StalledProvider));
        let store = SessionStore::new(Arc::new(cache), Duration::from_millis(50));

        let err = store.get(Namespace::AccessSession, "x").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::StoreUnavailable);
        assert!(!err.is_credential_error());

        let err = store
            .put(Namespace::AccessSession, "x", "v", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::StoreUnavailable);
    }

    #[tokio::test]
    async fn test_backend_error_is_store_unavailable() {
        let cache = CacheManager::from_provider(Arc::new(StalledProvider));
        let store = SessionStore::new(Arc::new(cache), Duration::from_millis(50));

        let err = store.ids(Namespace::AccessSession).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::StoreUnavailable);
    }
}
