//! Durable key/value storage for the coin list envelope.
//!
//! The store is string-in, string-out; the cache owns the JSON encoding.

use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;

/// Trait for persistence backends.
///
/// Implement this trait to keep the coin list somewhere other than disk.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
  /// Get a stored value by key. A missing key is `Ok(None)`.
  async fn get(&self, key: &str) -> StoreResult<Option<String>>;

  /// Store a value, replacing any previous one (last writer wins).
  async fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

/// One JSON file per key under a directory: `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
  dir: PathBuf,
}

impl FileStore {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  /// Keys become file names, so only `[A-Za-z0-9_-]` is accepted.
  fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
    let valid = !key.is_empty()
      && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
      return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(self.dir.join(format!("{key}.json")))
  }
}

#[async_trait]
impl KeyValueStore for FileStore {
  async fn get(&self, key: &str) -> StoreResult<Option<String>> {
    let path = self.path_for(key)?;
    match tokio::fs::read_to_string(&path).await {
      Ok(contents) => {
        debug!("Read {} bytes from {}", contents.len(), path.display());
        Ok(Some(contents))
      }
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }

  async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
    let path = self.path_for(key)?;
    tokio::fs::create_dir_all(&self.dir).await?;

    // Write-then-rename so a crash never leaves a half-written envelope.
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, value).await?;
    tokio::fs::rename(&tmp, &path).await?;

    debug!("Wrote {} bytes to {}", value.len(), path.display());
    Ok(())
  }
}

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
  entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
  async fn get(&self, key: &str) -> StoreResult<Option<String>> {
    Ok(self.entries.read().await.get(key).cloned())
  }

  async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
    self.entries.write().await.insert(key.to_string(), value.to_string());
    Ok(())
  }
}
