//! Persisted quiz progress.
//!
//! Two kinds of durable keys are used:
//! - `completedLevels`: JSON array of every completed level id (all languages)
//! - `lastLevel_<languageId>`: id of the last level completed in that language
//!
//! The store is injected into the engine; the engine is its only writer.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use crate::error::{CoreError, Result};

pub const COMPLETED_LEVELS_KEY: &str = "completedLevels";

pub fn last_level_key(language_id: &str) -> String {
    format!("lastLevel_{language_id}")
}

/// Durable key-value capability backing [`ProgressRecord`].
pub trait ProgressStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProgressStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self
            .inner
            .lock()
            .map_err(|_| CoreError::InvalidState("memory store poisoned".into()))?;
        Ok(map.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut map = self
            .inner
            .lock()
            .map_err(|_| CoreError::InvalidState("memory store poisoned".into()))?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Completed levels plus the last completed level of one language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressRecord {
    pub completed: BTreeSet<String>,
    pub last_level: Option<String>,
}

impl ProgressRecord {
    /// Read progress for `language_id`. Unreadable JSON counts as no progress.
    pub fn load(store: &dyn ProgressStore, language_id: &str) -> Result<Self> {
        let completed = match store.get(COMPLETED_LEVELS_KEY)? {
            Some(raw) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(ids) => ids.into_iter().collect(),
                Err(e) => {
                    tracing::warn!("ignoring corrupt {COMPLETED_LEVELS_KEY} value: {e}");
                    BTreeSet::new()
                }
            },
            None => BTreeSet::new(),
        };
        let last_level = store
            .get(&last_level_key(language_id))?
            .filter(|id| !id.trim().is_empty());
        Ok(Self {
            completed,
            last_level,
        })
    }

    pub fn is_completed(&self, level_id: &str) -> bool {
        self.completed.contains(level_id)
    }

    /// Mark `level_id` completed for `language_id` and write both keys.
    ///
    /// `self` only changes once both writes succeeded.
    pub fn record_completion(
        &mut self,
        store: &mut dyn ProgressStore,
        language_id: &str,
        level_id: &str,
    ) -> Result<()> {
        let mut completed = self.completed.clone();
        completed.insert(level_id.to_string());
        let ids: Vec<&String> = completed.iter().collect();
        store.set(COMPLETED_LEVELS_KEY, &serde_json::to_string(&ids)?)?;
        store.set(&last_level_key(language_id), level_id)?;

        self.completed = completed;
        self.last_level = Some(level_id.to_string());
        tracing::info!(language_id, level_id, "progress saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_means_no_progress() {
        let store = MemoryStore::new();
        let record = ProgressRecord::load(&store, "3").unwrap();
        assert!(record.completed.is_empty());
        assert!(record.last_level.is_none());
    }

    #[test]
    fn completion_roundtrips_through_store() {
        let mut store = MemoryStore::new();
        let mut record = ProgressRecord::default();
        record.record_completion(&mut store, "3", "10").unwrap();
        record.record_completion(&mut store, "3", "11").unwrap();

        assert_eq!(
            store.get(COMPLETED_LEVELS_KEY).unwrap().as_deref(),
            Some(r#"["10","11"]"#)
        );
        assert_eq!(store.get("lastLevel_3").unwrap().as_deref(), Some("11"));

        let reloaded = ProgressRecord::load(&store, "3").unwrap();
        assert_eq!(reloaded, record);
    }

    #[test]
    fn last_level_is_per_language() {
        let mut store = MemoryStore::new();
        let mut record = ProgressRecord::default();
        record.record_completion(&mut store, "3", "10").unwrap();

        let other = ProgressRecord::load(&store, "4").unwrap();
        assert!(other.is_completed("10"));
        assert!(other.last_level.is_none());
    }

    #[test]
    fn corrupt_completed_levels_is_ignored() {
        let mut store = MemoryStore::new();
        store.set(COMPLETED_LEVELS_KEY, "{not json").unwrap();
        let record = ProgressRecord::load(&store, "3").unwrap();
        assert!(record.completed.is_empty());
    }

    struct ReadOnlyStore;

    impl ProgressStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(CoreError::InvalidState("read-only store".into()))
        }
    }

    #[test]
    fn failed_write_leaves_record_untouched() {
        let mut record = ProgressRecord::default();
        assert!(record
            .record_completion(&mut ReadOnlyStore, "3", "10")
            .is_err());
        assert!(!record.is_completed("10"));
        assert!(record.last_level.is_none());
    }

    #[test]
    fn clones_share_state() {
        let store = MemoryStore::new();
        let mut writer = store.clone();
        writer.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.len(), 1);
    }
}
