//! Persisted filter selection.
//!
//! The selection is stored as one camelCase JSON blob under a fixed key in a
//! key/value store, the same shape a browser's local storage would hold.
//! Failures never propagate to the page: they are logged and the default
//! selection is used instead.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use shopfacet_core::FilterState;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Key the selection is stored under.
pub const STORAGE_KEY: &str = "wb_filters";

/// Errors from the persisted key/value store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A string key/value store.
pub trait StateStorage: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process store, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.remove(key);
        Ok(())
    }
}

/// JSON object file holding every key.
///
/// The whole file is rewritten on each change; a missing file reads as empty.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(items)?)?;
        Ok(())
    }
}

impl StateStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.read_all()?;
        items.insert(key.to_string(), value.to_string());
        self.write_all(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.read_all()?;
        if items.remove(key).is_some() {
            self.write_all(&items)?;
        }
        Ok(())
    }
}

/// Persist the selection. Failures are logged and swallowed.
pub fn save_state(storage: &dyn StateStorage, state: &FilterState) {
    let result = serde_json::to_string(state)
        .map_err(StorageError::from)
        .and_then(|blob| storage.set_item(STORAGE_KEY, &blob));

    match result {
        Ok(()) => debug!("Saved filter state"),
        Err(e) => error!(error = %e, "Failed to save filter state"),
    }
}

/// Restore the persisted selection, or the default when absent or unreadable.
#[must_use]
pub fn restore_state(storage: &dyn StateStorage) -> FilterState {
    let blob = match storage.get_item(STORAGE_KEY) {
        Ok(Some(blob)) => blob,
        Ok(None) => return FilterState::default(),
        Err(e) => {
            error!(error = %e, "Failed to read saved filter state");
            return FilterState::default();
        }
    };

    serde_json::from_str(&blob).unwrap_or_else(|e| {
        warn!(error = %e, "Discarding unreadable saved filter state");
        FilterState::default()
    })
}

/// Forget the persisted selection. Failures are logged and swallowed.
pub fn clear_state(storage: &dyn StateStorage) {
    if let Err(e) = storage.remove_item(STORAGE_KEY) {
        error!(error = %e, "Failed to clear saved filter state");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfacet_core::{CategoryId, SortKey};

    use super::*;

    /// Store whose every operation fails.
    struct BrokenStorage;

    impl StateStorage for BrokenStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(std::io::Error::other("quota exceeded").into())
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("quota exceeded").into())
        }

        fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("quota exceeded").into())
        }
    }

    fn sample_state() -> FilterState {
        let mut state = FilterState::default();
        state.toggle_category(CategoryId::new(4));
        state.toggle_season("winter");
        state.on_sale = true;
        state.sort_by = SortKey::Rating;
        state
    }

    #[test]
    fn test_memory_round_trip() {
        let storage = MemoryStorage::new();
        save_state(&storage, &sample_state());
        assert_eq!(restore_state(&storage), sample_state());

        clear_state(&storage);
        assert!(restore_state(&storage).is_empty());
    }

    #[test]
    fn test_blob_uses_fixed_key_and_camel_case() {
        let storage = MemoryStorage::new();
        save_state(&storage, &sample_state());
        let blob = storage.get_item(STORAGE_KEY).unwrap().unwrap();
        assert!(blob.contains("\"onSale\":true"));
        assert!(blob.contains("\"sortBy\":\"rating\""));
    }

    #[test]
    fn test_failures_fall_back_to_defaults() {
        save_state(&BrokenStorage, &sample_state());
        clear_state(&BrokenStorage);
        assert_eq!(restore_state(&BrokenStorage), FilterState::default());
    }

    #[test]
    fn test_corrupt_blob_falls_back_to_defaults() {
        let storage = MemoryStorage::new();
        storage.set_item(STORAGE_KEY, "{not json").unwrap();
        assert_eq!(restore_state(&storage), FilterState::default());
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let storage = FileStorage::new(&path);
        assert_eq!(storage.get_item("missing").unwrap(), None);
        save_state(&storage, &sample_state());
        storage.set_item("other", "kept").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(restore_state(&reopened), sample_state());
        reopened.remove_item(STORAGE_KEY).unwrap();
        assert_eq!(reopened.get_item("other").unwrap().as_deref(), Some("kept"));
    }
}
