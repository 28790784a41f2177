//! Keyed durable storage.
//!
//! The start page persists everything into one logical key-value namespace.
//! [`KeyValueStore`] is the seam the cache sits on: an in-memory
//! implementation backs tests, a JSON-document-on-disk implementation backs
//! the CLI (the moral equivalent of browser local storage).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use directories::ProjectDirs;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Async key-value persistence addressed by string keys.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<Value>>;
    async fn write(&self, key: &str, value: Value) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;

    /// All stored keys starting with `prefix`.
    async fn keys(&self, prefix: &str) -> Result<Vec<String>>;
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    async fn read(&self, key: &str) -> Result<Option<Value>> {
        (**self).read(key).await
    }

    async fn write(&self, key: &str, value: Value) -> Result<()> {
        (**self).write(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key).await
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        (**self).keys(prefix).await
    }
}

/// In-memory store backing tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Value>>> {
        self.entries
            .lock()
            .map_err(|_| Error::Storage("store mutex poisoned".to_string()))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn write(&self, key: &str, value: Value) -> Result<()> {
        self.lock()?.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .lock()?
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}

/// Store persisted as a single JSON object document on disk.
///
/// Every operation re-reads and rewrites the whole document; the store is
/// small (dozens of keys) and touched once per page load, so simplicity wins
/// over incremental writes.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Platform data path for the shared store document.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "newtab", "newtab").ok_or_else(|| {
            Error::Storage("could not determine platform data directory".to_string())
        })?;

        Ok(dirs.data_dir().join("store.json"))
    }

    async fn load(&self) -> Result<Map<String, Value>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(err) => Err(Error::Storage(format!(
                "failed to read {}: {err}",
                self.path.display()
            ))),
        }
    }

    async fn persist(&self, document: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|err| {
                Error::Storage(format!(
                    "failed to create store directory {}: {err}",
                    parent.display()
                ))
            })?;
        }

        let bytes = serde_json::to_vec(document)?;
        tokio::fs::write(&self.path, bytes).await.map_err(|err| {
            Error::Storage(format!("failed to write {}: {err}", self.path.display()))
        })
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn read(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.load().await?.get(key).cloned())
    }

    async fn write(&self, key: &str, value: Value) -> Result<()> {
        let mut document = self.load().await?;
        document.insert(key.to_string(), value);
        self.persist(&document).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut document = self.load().await?;
        if document.remove(key).is_some() {
            self.persist(&document).await?;
        }
        Ok(())
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .load()
            .await?
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}
