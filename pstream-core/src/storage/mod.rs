//! Local persisted state
//!
//! Namespaced key-value entries (credential mappings, preferences, and the
//! bookmark/progress records treated as opaque JSON). Backed by a single
//! JSON file with atomic rename writes; an in-memory variant exists for
//! tests.

pub mod preferences;

pub use preferences::PreferenceStore;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value as JsonValue;

use crate::{Error, Result};

/// Namespaced key-value storage.
///
/// Values are plain JSON; callers own their schemas. Implementations must be
/// safe to share across tasks.
pub trait KvStore: Send + Sync {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<JsonValue>>;
    fn set(&self, namespace: &str, key: &str, value: JsonValue) -> Result<()>;
    fn remove(&self, namespace: &str, key: &str) -> Result<()>;
    fn keys(&self, namespace: &str) -> Result<Vec<String>>;
}

type Namespaces = HashMap<String, HashMap<String, JsonValue>>;

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<Namespaces>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn shared() -> Arc<dyn KvStore> {
        Arc::new(Self::new())
    }
}

impl KvStore for MemoryStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<JsonValue>> {
        Ok(self
            .data
            .read()
            .get(namespace)
            .and_then(|ns| ns.get(key))
            .cloned())
    }

    fn set(&self, namespace: &str, key: &str, value: JsonValue) -> Result<()> {
        self.data
            .write()
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, namespace: &str, key: &str) -> Result<()> {
        if let Some(ns) = self.data.write().get_mut(namespace) {
            ns.remove(key);
        }
        Ok(())
    }

    fn keys(&self, namespace: &str) -> Result<Vec<String>> {
        Ok(self
            .data
            .read()
            .get(namespace)
            .map(|ns| ns.keys().cloned().collect())
            .unwrap_or_default())
    }
}

/// JSON-file-backed store.
///
/// The whole document is held in memory and rewritten on every mutation via
/// a temp file + rename, so a crash mid-write never leaves a torn file.
pub struct JsonFileStore {
    path: PathBuf,
    data: RwLock<Namespaces>,
}

impl JsonFileStore {
    /// Open (or create) the store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                Namespaces::default()
            } else {
                serde_json::from_str(&raw)
                    .map_err(|e| Error::Storage(format!("Corrupt store file {}: {e}", path.display())))?
            }
        } else {
            Namespaces::default()
        };
        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    fn persist(&self, data: &Namespaces) -> Result<()> {
        let raw = serde_json::to_string_pretty(data)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, raw)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KvStore for JsonFileStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<JsonValue>> {
        Ok(self
            .data
            .read()
            .get(namespace)
            .and_then(|ns| ns.get(key))
            .cloned())
    }

    fn set(&self, namespace: &str, key: &str, value: JsonValue) -> Result<()> {
        let mut data = self.data.write();
        data.entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value);
        self.persist(&data)
    }

    fn remove(&self, namespace: &str, key: &str) -> Result<()> {
        let mut data = self.data.write();
        let removed = data
            .get_mut(namespace)
            .is_some_and(|ns| ns.remove(key).is_some());
        if removed {
            self.persist(&data)?;
        }
        Ok(())
    }

    fn keys(&self, namespace: &str) -> Result<Vec<String>> {
        Ok(self
            .data
            .read()
            .get(namespace)
            .map(|ns| ns.keys().cloned().collect())
            .unwrap_or_default())
    }
}
