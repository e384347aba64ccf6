use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use crate::error::StorageError;

// 1. DurableStorage Contract
/// DurableStorage
///
/// The key/value contract behind the session store. It plays the role the
/// browser's local storage played for the web client: one string value per
/// fixed key, surviving a restart.
///
/// Implementations are synchronous; callers on the navigation path must never
/// suspend.
pub trait DurableStorage: Send + Sync {
    /// Returns the stored value, or `None` when the key has never been written
    /// (or has been removed).
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes the value under `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// 2. The Real Implementation (one file per key)
/// FileStorage
///
/// Stores each key as `<dir>/<key>.json`. The directory is created on the
/// first write, so constructing a `FileStorage` never touches the disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let file = sanitize_key(key).ok_or_else(|| StorageError::InvalidKey(key.to_string()))?;
        Ok(self.dir.join(format!("{}.json", file)))
    }
}

impl DurableStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        // Write-then-rename so a crash mid-write never leaves a truncated record.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// sanitize_key
///
/// Reduces a storage key to a single safe file name: path separators are
/// treated as segment breaks, `.`/`..`/empty segments are dropped and the rest
/// is joined with `_`. Returns `None` when nothing usable remains.
fn sanitize_key(key: &str) -> Option<String> {
    let cleaned = key
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .collect::<Vec<_>>()
        .join("_");

    if cleaned.is_empty() { None } else { Some(cleaned) }
}

// 3. The In-Memory Implementation (tests and ephemeral hosts)
/// MemoryStorage
///
/// Keeps records in a process-local map. `new_failing` simulates a storage
/// that refuses every write and removal (quota exceeded, read-only disk)
/// while reads keep working.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: Mutex<HashMap<String, String>>,
    /// When true, `write` and `remove` return a simulated failure.
    pub should_fail: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Seeds a single record, e.g. a hand-written or corrupt session.
    pub fn with_record(key: &str, value: &str) -> Self {
        let storage = Self::new();
        if let Ok(mut records) = storage.records.lock() {
            records.insert(key.to_string(), value.to_string());
        }
        storage
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.records
            .lock()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".to_string()))
    }
}

impl DurableStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.should_fail {
            return Err(StorageError::Unavailable(
                "Mock Storage Error: Simulation requested".to_string(),
            ));
        }
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.should_fail {
            return Err(StorageError::Unavailable(
                "Mock Storage Error: Simulation requested".to_string(),
            ));
        }
        self.lock()?.remove(key);
        Ok(())
    }
}

/// StorageState
///
/// The shared handle to the durable storage backend.
pub type StorageState = Arc<dyn DurableStorage>;
