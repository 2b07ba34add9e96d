// src/core/store.rs
//! String key-value persistence, the local-storage of the console client

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Synchronous string store shared by the viewed-CV registry and the token store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

// ===== In-memory store =====

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

// ===== JSON file store =====

/// Whole store is one JSON object on disk, rewritten on every mutation.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            Self::read_entries(&path)?
        } else {
            BTreeMap::new()
        };
        debug!("Opened store {} with {} entries", path.display(), entries.len());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(path: &Path) -> Result<BTreeMap<String, String>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read store: {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!("Store {} is corrupt, starting empty: {}", path.display(), e);
                Ok(BTreeMap::new())
            }
        }
    }

    fn mutate<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("file store lock poisoned"))?;
        change(&mut entries);
        self.flush(&entries)
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(entries).context("Failed to encode store")?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)
            .with_context(|| format!("Failed to write file: {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace store: {}", self.path.display()))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("file store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.mutate(|entries| {
            entries.remove(key);
        })
    }
}
