use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use std::{
    collections::BTreeMap,
    fmt::Debug,
    fs,
    path::PathBuf,
    sync::{Mutex, PoisonError},
};

/// Persisted key-value capability injected into [`crate::selection::SelectionStore`].
///
/// Single-writer and read-after-write consistent; all access originates
/// from the same coordination context, so implementations need no locking
/// beyond interior mutability.
pub trait KeyValueStore: Send + Sync + Debug {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed store: a flat TOML table of strings under the platform data
/// directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store at the default platform location.
    pub fn open_default() -> Result<Self> {
        let dirs = ProjectDirs::from("dev", "weather-tracker", "tracker")
            .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;

        Ok(Self { path: dirs.data_dir().join("state.toml") })
    }

    /// Store at an explicit path (tests, embedders with their own layout).
    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse state file: {}", self.path.display()))
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create state directory: {}", parent.display()))?;
        }

        let toml = toml::to_string_pretty(map).context("Failed to serialize state to TOML")?;

        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))?;

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_map()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)?;
        tracing::debug!(key, path = %self.path.display(), "stored entry");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
            tracing::debug!(key, "removed entry");
        }
        Ok(())
    }
}

/// In-memory store for tests and embedders that manage persistence
/// themselves.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::at_path(dir.path().join("state.toml"));
        (dir, store)
    }

    #[test]
    fn file_store_missing_file_reads_as_absent() {
        let (_dir, store) = temp_store();
        assert_eq!(store.get("saved_query").unwrap(), None);
    }

    #[test]
    fn file_store_set_then_get_round_trips() {
        let (_dir, store) = temp_store();
        store.set("saved_query", "40.7,-74.0").unwrap();
        assert_eq!(store.get("saved_query").unwrap().as_deref(), Some("40.7,-74.0"));
    }

    #[test]
    fn file_store_set_overwrites_previous_value() {
        let (_dir, store) = temp_store();
        store.set("saved_query", "London").unwrap();
        store.set("saved_query", "Paris").unwrap();
        assert_eq!(store.get("saved_query").unwrap().as_deref(), Some("Paris"));
    }

    #[test]
    fn file_store_remove_deletes_only_that_key() {
        let (_dir, store) = temp_store();
        store.set("saved_query", "London").unwrap();
        store.set("last_updated", "2026-01-26T00:00:00Z").unwrap();
        store.remove("saved_query").unwrap();
        assert_eq!(store.get("saved_query").unwrap(), None);
        assert!(store.get("last_updated").unwrap().is_some());
    }

    #[test]
    fn file_store_remove_missing_key_is_a_no_op() {
        let (_dir, store) = temp_store();
        store.remove("saved_query").unwrap();
        assert_eq!(store.get("saved_query").unwrap(), None);
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStore::new();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
