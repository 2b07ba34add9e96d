// src/directory/viewed.rs
//! Which CV documents the operator has already opened
//!
//! Purely informational: drives the viewed/unviewed badge, never access.
//! Entries are only ever added.

use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::store::KeyValueStore;
use crate::types::employee::{CvKind, EmployeeId};

pub const VIEWED_CVS_KEY: &str = "agn_viewed_cvs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CvBadge {
    Unviewed,
    Viewed,
}

impl CvBadge {
    pub fn label(&self) -> &'static str {
        match self {
            CvBadge::Unviewed => "Not viewed",
            CvBadge::Viewed => "Viewed",
        }
    }
}

pub struct ViewedCvRegistry {
    store: Arc<dyn KeyValueStore>,
    entries: BTreeMap<String, String>,
}

impl ViewedCvRegistry {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = Self::read(store.as_ref());
        debug!("Loaded {} viewed CV entries", entries.len());
        Self { store, entries }
    }

    pub fn key(id: EmployeeId, kind: CvKind) -> String {
        format!("{}_{}", id, kind.as_str())
    }

    pub fn is_viewed(&self, id: EmployeeId, kind: CvKind) -> bool {
        self.entries.contains_key(&Self::key(id, kind))
    }

    pub fn badge(&self, id: EmployeeId, kind: CvKind) -> CvBadge {
        if self.is_viewed(id, kind) {
            CvBadge::Viewed
        } else {
            CvBadge::Unviewed
        }
    }

    pub fn viewed_at(&self, id: EmployeeId, kind: CvKind) -> Option<DateTime<Utc>> {
        self.entries
            .get(&Self::key(id, kind))
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&Utc))
    }

    /// Record the first view of a document. Later views keep the original
    /// timestamp. Persistence failures are logged; the in-memory mark stays.
    pub fn mark_viewed(&mut self, id: EmployeeId, kind: CvKind) {
        let key = Self::key(id, kind);
        if self.entries.contains_key(&key) {
            return;
        }

        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.entries.insert(key, now);
        self.persist();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn read(store: &dyn KeyValueStore) -> BTreeMap<String, String> {
        match store.get(VIEWED_CVS_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Error loading viewed CVs: {}", e);
                BTreeMap::new()
            }),
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                warn!("Error loading viewed CVs: {}", e);
                BTreeMap::new()
            }
        }
    }

    /// Merge with whatever another writer stored meanwhile, keeping first-view times.
    fn persist(&mut self) {
        for (key, ts) in Self::read(self.store.as_ref()) {
            self.entries.entry(key).or_insert(ts);
        }

        let result = serde_json::to_string(&self.entries)
            .map_err(anyhow::Error::from)
            .and_then(|raw| self.store.set(VIEWED_CVS_KEY, &raw));
        if let Err(e) = result {
            warn!("Error saving viewed CV: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::MemoryStore;

    #[test]
    fn test_masked_and_original_tracked_separately() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut registry = ViewedCvRegistry::load(store.clone());
        assert!(registry.is_empty());

        registry.mark_viewed(42, CvKind::Masked);

        assert!(registry.is_viewed(42, CvKind::Masked));
        assert!(!registry.is_viewed(42, CvKind::Original));
        assert_eq!(registry.badge(42, CvKind::Original), CvBadge::Unviewed);

        let raw = store.get(VIEWED_CVS_KEY).unwrap().unwrap();
        let stored: BTreeMap<String, String> = serde_json::from_str(&raw).unwrap();
        assert!(stored.contains_key("42_masked"));
        assert!(!stored.contains_key("42_original"));
        assert!(DateTime::parse_from_rfc3339(&stored["42_masked"]).is_ok());
    }

    #[test]
    fn test_survives_reload_and_keeps_first_timestamp() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut registry = ViewedCvRegistry::load(store.clone());
        registry.mark_viewed(7, CvKind::Original);
        let first = registry.viewed_at(7, CvKind::Original).unwrap();

        let mut reloaded = ViewedCvRegistry::load(store);
        assert_eq!(reloaded.badge(7, CvKind::Original), CvBadge::Viewed);
        reloaded.mark_viewed(7, CvKind::Original);
        assert_eq!(reloaded.viewed_at(7, CvKind::Original).unwrap(), first);
    }

    #[test]
    fn test_concurrent_writers_merge() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut a = ViewedCvRegistry::load(store.clone());
        let mut b = ViewedCvRegistry::load(store.clone());

        a.mark_viewed(1, CvKind::Original);
        b.mark_viewed(2, CvKind::Masked);

        let reloaded = ViewedCvRegistry::load(store);
        assert!(reloaded.is_viewed(1, CvKind::Original));
        assert!(reloaded.is_viewed(2, CvKind::Masked));
    }

    #[test]
    fn test_corrupt_entry_starts_empty() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set(VIEWED_CVS_KEY, "[not a map").unwrap();

        let registry = ViewedCvRegistry::load(store);
        assert_eq!(registry.len(), 0);
    }
}
