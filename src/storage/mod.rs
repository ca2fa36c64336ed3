//! Key-value persistence for the case list and the match cursor
//!
//! Values are stored as JSON under fixed keys, mirroring the extension's local
//! storage layout: `cases` holds the ordered case list and
//! `currentMatchIndex` the last cursor position.

pub mod file;

pub use file::JsonFileStore;

use crate::error::{CaseFinderError, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Key of the ordered case list
pub const CASES_KEY: &str = "cases";

/// Key of the persisted cursor position
pub const CURRENT_MATCH_INDEX_KEY: &str = "currentMatchIndex";

/// A best-effort key-value store
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `None` when the key was never written
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Write a value
    fn set(&self, key: &str, value: Value) -> Result<()>;
}

/// Store shared between the list manager and page hosts
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Volatile store, useful for tests and sessions without a disk
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let values = self
            .values
            .lock()
            .map_err(|e| CaseFinderError::PersistenceUnavailable(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| CaseFinderError::PersistenceUnavailable(e.to_string()))?;
        values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Read the persisted cursor; negative or malformed values mean "none"
pub fn load_current_match_index(store: &dyn KeyValueStore) -> Result<Option<usize>> {
    let index = store
        .get(CURRENT_MATCH_INDEX_KEY)?
        .and_then(|value| value.as_i64())
        .and_then(|index| usize::try_from(index).ok());
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert_eq!(store.get(CASES_KEY).unwrap(), None);

        store.set(CASES_KEY, json!(["A-1"])).unwrap();
        assert_eq!(store.get(CASES_KEY).unwrap(), Some(json!(["A-1"])));
    }

    #[test]
    fn test_load_current_match_index() {
        let store = MemoryStore::new();
        assert_eq!(load_current_match_index(&store).unwrap(), None);

        store.set(CURRENT_MATCH_INDEX_KEY, json!(3)).unwrap();
        assert_eq!(load_current_match_index(&store).unwrap(), Some(3));

        store.set(CURRENT_MATCH_INDEX_KEY, json!(-1)).unwrap();
        assert_eq!(load_current_match_index(&store).unwrap(), None);

        store.set(CURRENT_MATCH_INDEX_KEY, json!("two")).unwrap();
        assert_eq!(load_current_match_index(&store).unwrap(), None);
    }
}
