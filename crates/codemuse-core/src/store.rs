use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::storage;
use crate::error::CodeMuseError;

/// Durable key/value state, the terminal counterpart of browser local storage.
///
/// The whole map lives in one JSON object file and is loaded once on open.
/// Reads never fail: a missing or mismatched entry yields the caller's
/// initial value. Writes are attempted on every `set` and failures are only
/// logged, so persistence problems never reach the editor.
#[derive(Debug)]
pub struct Store {
    path: Option<PathBuf>,
    entries: Map<String, Value>,
}

impl Store {
    /// Open the store at the default location (`<data_dir>/codemuse/state.json`).
    pub fn open_default() -> Result<Self, CodeMuseError> {
        Ok(Self::open(Self::default_path()?))
    }

    /// Open a store backed by `path`. An unreadable or corrupt file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match Self::read_entries(&path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Error reading state file {}: {e}", path.display());
                Map::new()
            }
        };
        Self {
            path: Some(path),
            entries,
        }
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Map::new(),
        }
    }

    pub fn default_path() -> Result<PathBuf, CodeMuseError> {
        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| CodeMuseError::Config("Could not determine data directory".into()))?;
        Ok(base.join(storage::DATA_DIR).join(storage::STATE_FILE))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn read_entries(path: &Path) -> Result<Map<String, Value>, CodeMuseError> {
        if !path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Value stored under `key`, or `initial` when absent or of another shape.
    pub fn get<T: DeserializeOwned>(&self, key: &str, initial: T) -> T {
        match self.entries.get(key) {
            Some(value) => match serde_json::from_value(value.clone()) {
                Ok(v) => v,
                Err(e) => {
                    warn!("Error reading stored key \"{key}\": {e}");
                    initial
                }
            },
            None => initial,
        }
    }

    /// Store `value` under `key` and write the file.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(v) => {
                self.entries.insert(key.to_string(), v);
                self.flush(key);
            }
            Err(e) => warn!("Error setting stored key \"{key}\": {e}"),
        }
    }

    fn flush(&self, key: &str) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = self.write_entries(path) {
            warn!("Error setting stored key \"{key}\": {e}");
        } else {
            debug!("Persisted \"{key}\" to {}", path.display());
        }
    }

    fn write_entries(&self, path: &Path) -> Result<(), CodeMuseError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.entries)?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_returns_initial_when_missing() {
        let store = Store::in_memory();
        let v: Vec<String> = store.get("nothing", vec!["x".to_string()]);
        assert_eq!(v, vec!["x".to_string()]);
    }

    #[test]
    fn test_set_then_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");

        let mut store = Store::open(&path);
        store.set("count", &42u32);
        drop(store);

        let reopened = Store::open(&path);
        assert_eq!(reopened.get("count", 0u32), 42);
    }

    #[test]
    fn test_shape_mismatch_falls_back_to_initial() {
        let mut store = Store::in_memory();
        store.set("files", &"not a list");
        let files: Vec<u32> = store.get("files", vec![7]);
        assert_eq!(files, vec![7]);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();

        let store = Store::open(&path);
        assert_eq!(store.get("anything", 5u8), 5);
    }

    #[test]
    fn test_write_failure_does_not_panic() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be makes the rename fail.
        let path = dir.path().join("state.json");
        fs::create_dir_all(&path).unwrap();

        let mut store = Store::open(&path);
        store.set("k", &1u8);
        assert_eq!(store.get("k", 0u8), 1);
    }
}
