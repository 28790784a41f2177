//! TTL-based key-value cache layered over a [`KeyValueStore`].
//!
//! Entries expire lazily: every read purges whatever has lapsed instead of
//! running a background sweep. The store holds dozens of keys and is read
//! once per page load, so the extra scan is cheap. There is no entry-count
//! or byte-size bound, only time-based eviction.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::storage::KeyValueStore;

/// TTL applied when the caller does not pass one.
pub const DEFAULT_TTL_MINUTES: f64 = 60.0;

const MS_PER_MINUTE: f64 = 60_000.0;

/// One cached value plus its absolute expiry (epoch milliseconds).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,
}

impl CacheEntry {
    fn is_expired(&self, now: i64) -> bool {
        self.expiry.is_some_and(|expiry| now >= expiry)
    }
}

/// Expiring cache decorating a keyed store. All entries live under a root
/// prefix (`"cache/"` by default) so [`flush`](ExpiringCache::flush) can
/// drop them without touching unrelated keys.
#[derive(Debug)]
pub struct ExpiringCache<S> {
    store: S,
    root: String,
}

impl<S: KeyValueStore> ExpiringCache<S> {
    pub fn new(store: S) -> Self {
        Self::with_root(store, "cache")
    }

    pub fn with_root(store: S, root: impl Into<String>) -> Self {
        Self {
            store,
            root: root.into(),
        }
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}/{key}", self.root)
    }

    fn prefix(&self) -> String {
        format!("{}/", self.root)
    }

    /// Look up `key`, purging expired entries across the namespace first.
    /// Returns `None` for absent or expired entries; an entry whose expiry
    /// lapsed between the purge and the lookup is deleted as part of the
    /// read.
    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        self.purge_expired().await?;

        let Some(raw) = self.store.read(&self.storage_key(key)).await? else {
            return Ok(None);
        };
        let entry: CacheEntry = serde_json::from_value(raw)?;

        if entry.is_expired(now_ms()) {
            self.delete(key).await?;
            return Ok(None);
        }

        Ok(Some(entry.value))
    }

    /// Store `value` under `key`. `ttl_minutes` defaults to
    /// [`DEFAULT_TTL_MINUTES`]; fractional TTLs are honored, and zero or
    /// negative TTLs expire on the next read. Returns the stored value
    /// unchanged so the call can be inlined as an expression.
    pub async fn set(&self, key: &str, value: Value, ttl_minutes: Option<f64>) -> Result<Value> {
        let ttl = ttl_minutes.unwrap_or(DEFAULT_TTL_MINUTES);
        let entry = CacheEntry {
            value: value.clone(),
            expiry: Some(now_ms() + (ttl * MS_PER_MINUTE) as i64),
        };

        self.store
            .write(&self.storage_key(key), serde_json::to_value(&entry)?)
            .await?;

        Ok(value)
    }

    /// Remove `key` if present. Absent keys cause no storage mutation.
    pub async fn delete(&self, key: &str) -> Result<()> {
        let storage_key = self.storage_key(key);
        if self.store.read(&storage_key).await?.is_some() {
            self.store.remove(&storage_key).await?;
        }
        Ok(())
    }

    /// Drop every entry managed by this cache instance.
    pub async fn flush(&self) -> Result<()> {
        for key in self.store.keys(&self.prefix()).await? {
            self.store.remove(&key).await?;
        }
        Ok(())
    }

    /// Remove every expired entry, returning how many were dropped. Issues
    /// no storage mutation when nothing is expired.
    pub async fn purge_expired(&self) -> Result<usize> {
        let now = now_ms();
        let mut removed = 0;

        for storage_key in self.store.keys(&self.prefix()).await? {
            let Some(raw) = self.store.read(&storage_key).await? else {
                continue;
            };
            let entry: CacheEntry = serde_json::from_value(raw)?;
            if entry.is_expired(now) {
                self.store.remove(&storage_key).await?;
                removed += 1;
            }
        }

        Ok(removed)
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Wrapper counting mutations, for the idempotent-purge property.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        mutations: AtomicUsize,
    }

    #[async_trait]
    impl KeyValueStore for CountingStore {
        async fn read(&self, key: &str) -> Result<Option<Value>> {
            self.inner.read(key).await
        }

        async fn write(&self, key: &str, value: Value) -> Result<()> {
            self.mutations.fetch_add(1, Ordering::SeqCst);
            self.inner.write(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<()> {
            self.mutations.fetch_add(1, Ordering::SeqCst);
            self.inner.remove(key).await
        }

        async fn keys(&self, prefix: &str) -> Result<Vec<String>> {
            self.inner.keys(prefix).await
        }
    }

    fn cache() -> ExpiringCache<MemoryStore> {
        ExpiringCache::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn set_then_get_returns_value() {
        let cache = cache();

        let stored = cache.set("profile", json!({"name": "x"}), None).await.unwrap();
        assert_eq!(stored, json!({"name": "x"}));

        assert_eq!(
            cache.get("profile").await.unwrap(),
            Some(json!({"name": "x"}))
        );
    }

    #[tokio::test]
    async fn get_missing_key_returns_none() {
        assert_eq!(cache().get("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn zero_ttl_expires_on_next_read_and_removes_key() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let cache = ExpiringCache::new(store.clone());

        cache.set("k", json!(1), Some(0.0)).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), None);

        // The expired entry must be physically gone, not just hidden.
        assert_eq!(store.read("cache/k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn negative_ttl_expires_immediately() {
        let cache = cache();
        cache.set("k", json!(1), Some(-5.0)).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn fractional_ttl_expires_after_elapse() {
        let cache = cache();

        // 0.001 minutes = 60ms.
        cache.set("k", json!("v"), Some(0.001)).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some(json!("v")));

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn unrelated_keys_do_not_interfere() {
        let cache = cache();

        cache.set("a", json!("v1"), None).await.unwrap();
        cache.set("b", json!("v2"), None).await.unwrap();

        assert_eq!(cache.get("a").await.unwrap(), Some(json!("v1")));
        assert_eq!(cache.get("b").await.unwrap(), Some(json!("v2")));
    }

    #[tokio::test]
    async fn delete_removes_only_that_key() {
        let cache = cache();

        cache.set("a", json!(1), None).await.unwrap();
        cache.set("b", json!(2), None).await.unwrap();

        cache.delete("a").await.unwrap();
        assert_eq!(cache.get("a").await.unwrap(), None);
        assert_eq!(cache.get("b").await.unwrap(), Some(json!(2)));

        // Deleting an absent key is fine.
        cache.delete("a").await.unwrap();
    }

    #[tokio::test]
    async fn flush_drops_everything() {
        let cache = cache();

        cache.set("a", json!(1), None).await.unwrap();
        cache.set("b", json!(2), None).await.unwrap();
        cache.flush().await.unwrap();

        assert_eq!(cache.get("a").await.unwrap(), None);
        assert_eq!(cache.get("b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn flush_leaves_keys_outside_the_root_alone() {
        let store = std::sync::Arc::new(MemoryStore::new());
        store.write("settings", json!("keep")).await.unwrap();

        let cache = ExpiringCache::new(store.clone());
        cache.set("a", json!(1), None).await.unwrap();
        cache.flush().await.unwrap();

        assert_eq!(store.read("settings").await.unwrap(), Some(json!("keep")));
    }

    #[tokio::test]
    async fn purge_is_idempotent() {
        let store = CountingStore::default();
        let cache = ExpiringCache::new(store);

        cache.set("stale", json!(1), Some(-1.0)).await.unwrap();
        cache.set("fresh", json!(2), None).await.unwrap();
        let after_sets = cache.store.mutations.load(Ordering::SeqCst);

        assert_eq!(cache.purge_expired().await.unwrap(), 1);
        let after_first = cache.store.mutations.load(Ordering::SeqCst);
        assert_eq!(after_first, after_sets + 1);

        // Nothing left to purge: the second pass must not touch storage.
        assert_eq!(cache.purge_expired().await.unwrap(), 0);
        assert_eq!(cache.store.mutations.load(Ordering::SeqCst), after_first);
    }

    #[tokio::test]
    async fn entry_without_expiry_never_expires() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let cache = ExpiringCache::new(store.clone());

        let entry = CacheEntry {
            value: json!("forever"),
            expiry: None,
        };
        store
            .write("cache/pinned", serde_json::to_value(&entry).unwrap())
            .await
            .unwrap();

        assert_eq!(cache.get("pinned").await.unwrap(), Some(json!("forever")));
        assert_eq!(cache.purge_expired().await.unwrap(), 0);
    }
}
