use crate::error::{MaintlyticsError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Logical key holding the ordered activity event log
pub const ACTIVITY_LOGS_KEY: &str = "activity_logs";
/// Logical key holding the single derived metrics document
pub const ACTIVITY_METRICS_KEY: &str = "activity_metrics";

/// Key-value backend for the tracker's persisted state
///
/// Values are always UTF-8 JSON documents. Atomicity is only provided at
/// the granularity of a single key; concurrent writers racing on the same
/// key are last-writer-wins.
pub trait ActivityStore {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store, used by tests and one-shot pipelines
#[derive(Debug, Default)]
#[allow(dead_code)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ActivityStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// File-backed store keeping one JSON file per logical key
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Default data directory (`<data_dir>/maintlytics`)
    pub fn default_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| {
                MaintlyticsError::config_error("could not determine data directory")
            })?;
        Ok(data_dir.join("maintlytics"))
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl ActivityStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| MaintlyticsError::storage_error(key, &e.to_string()))?;
        Ok(Some(content))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| MaintlyticsError::storage_error(key, &e.to_string()))?;
        fs::write(self.key_path(key), value)
            .map_err(|e| MaintlyticsError::storage_error(key, &e.to_string()))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| MaintlyticsError::storage_error(key, &e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.read("missing").unwrap(), None);

        store.write(ACTIVITY_LOGS_KEY, "[]").unwrap();
        assert_eq!(store.read(ACTIVITY_LOGS_KEY).unwrap().as_deref(), Some("[]"));

        store.remove(ACTIVITY_LOGS_KEY).unwrap();
        assert_eq!(store.read(ACTIVITY_LOGS_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::new(tmp.path().join("data"));

        assert_eq!(store.read(ACTIVITY_METRICS_KEY).unwrap(), None);

        store.write(ACTIVITY_METRICS_KEY, "{\"totalActivities\":0}").unwrap();
        let content = store.read(ACTIVITY_METRICS_KEY).unwrap().unwrap();
        assert!(content.contains("totalActivities"));

        store.remove(ACTIVITY_METRICS_KEY).unwrap();
        assert_eq!(store.read(ACTIVITY_METRICS_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_remove_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::new(tmp.path().to_path_buf());
        store.remove("never_written").unwrap();
        store.remove("never_written").unwrap();
    }
}
