use crate::error::{CaseFinderError, Result};
use crate::storage::KeyValueStore;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Store persisted as one JSON object in a file
///
/// Every write rewrites the whole file through a temporary sibling, so a
/// crash leaves either the old or the new contents behind.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(CaseFinderError::PersistenceUnavailable(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&contents) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(CaseFinderError::PersistenceUnavailable(format!(
                "{} does not hold a JSON object: {}",
                self.path.display(),
                other
            ))),
            Err(e) => Err(CaseFinderError::PersistenceUnavailable(format!(
                "Failed to parse {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn write_all(&self, map: &Map<String, Value>) -> Result<()> {
        let json = serde_json::to_string_pretty(map)?;
        let tmp = self.path.with_extension("tmp");

        fs::write(&tmp, json)
            .and_then(|_| fs::rename(&tmp, &self.path))
            .map_err(|e| {
                CaseFinderError::PersistenceUnavailable(format!("Failed to write {}: {}", self.path.display(), e))
            })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| CaseFinderError::PersistenceUnavailable(e.to_string()))?;
        Ok(self.read_all()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| CaseFinderError::PersistenceUnavailable(e.to_string()))?;
        let mut map = self.read_all()?;
        map.insert(key.to_string(), value);
        self.write_all(&map)?;
        log::debug!("Saved '{}' to {}", key, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CASES_KEY, CURRENT_MATCH_INDEX_KEY};
    use serde_json::json;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("store.json"));

        assert_eq!(store.get(CASES_KEY).unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = JsonFileStore::new(&path);
        store.set(CASES_KEY, json!(["B-2", "A-1"])).unwrap();
        store.set(CURRENT_MATCH_INDEX_KEY, json!(1)).unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.get(CASES_KEY).unwrap(), Some(json!(["B-2", "A-1"])));
        assert_eq!(reopened.get(CURRENT_MATCH_INDEX_KEY).unwrap(), Some(json!(1)));
    }

    #[test]
    fn test_corrupt_file_reports_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::new(&path);
        let err = store.get(CASES_KEY).unwrap_err();
        assert!(matches!(err, CaseFinderError::PersistenceUnavailable(_)));
    }

    #[test]
    fn test_unwritable_location() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("missing").join("store.json"));

        let err = store.set(CASES_KEY, json!([])).unwrap_err();
        assert!(matches!(err, CaseFinderError::PersistenceUnavailable(_)));
    }
}
