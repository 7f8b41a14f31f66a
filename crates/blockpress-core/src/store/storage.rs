//! Key/value storage backends
//!
//! The workspace persists a handful of string values by key. [`FileStorage`]
//! keeps one `<key>.json` file per key in the data directory; [`MemoryStorage`]
//! keeps them in process and can simulate a full or unavailable store.

use crate::config::consts;
use crate::lock::{self, LockError};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Why a value could not be persisted or read back
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("STORAGE_QUOTA_EXCEEDED: not enough space to store '{key}'")]
    QuotaExceeded { key: String },

    #[error("STORAGE_UNAVAILABLE: {0}")]
    Unavailable(String),

    #[error("DATA_TOO_LARGE: saved data is {size} bytes, the limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    #[error("STORAGE_IO_ERROR: {operation} '{key}': {source}")]
    Io {
        key: String,
        operation: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("SERIALIZE_FAILED: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Lock(#[from] LockError),
}

/// String values addressed by key
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
    fn remove(&mut self, key: &str) -> Result<(), PersistError>;
}

const WRITE_LOCK_TIMEOUT: Duration = Duration::from_secs(30);
const READ_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// One JSON file per key inside a data directory
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

    /// File a key is stored in
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn lock_path(&self) -> PathBuf {
        self.dir.join(consts::files::LOCK_FILE)
    }

    fn ensure_dir(&self, key: &str) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir).map_err(|e| classify(key, "create data directory for", e))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        let path = self.path_for(key);
        if !self.dir.exists() {
            return Ok(None);
        }
        let _guard = lock::acquire_shared_lock(&self.lock_path(), READ_LOCK_TIMEOUT, "read data")?;

        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(classify(key, "read", e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.ensure_dir(key)?;
        let _guard = lock::acquire_lock(&self.lock_path(), WRITE_LOCK_TIMEOUT, "save data")?;
        atomic_write(&self.dir, &self.path_for(key), value).map_err(|e| classify(key, "write", e))
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        if !self.dir.exists() {
            return Ok(());
        }
        let _guard = lock::acquire_lock(&self.lock_path(), WRITE_LOCK_TIMEOUT, "remove data")?;

        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(classify(key, "remove", e)),
        }
    }
}

/// Writes `content` to `path` via a temp file in `dir`, then fsyncs the directory
fn atomic_write(dir: &Path, path: &Path, content: &str) -> io::Result<()> {
    let mut temp_file = NamedTempFile::new_in(dir)?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(path).map_err(|e| e.error)?;

    #[cfg(unix)]
    {
        fs::File::open(dir)?.sync_all()?;
    }

    Ok(())
}

/// Maps an I/O failure to the persistence error callers can act on
fn classify(key: &str, operation: &'static str, e: io::Error) -> PersistError {
    match e.kind() {
        io::ErrorKind::StorageFull => PersistError::QuotaExceeded {
            key: key.to_string(),
        },
        io::ErrorKind::PermissionDenied | io::ErrorKind::ReadOnlyFilesystem => {
            PersistError::Unavailable(format!("cannot {} '{}': {}", operation, key, e))
        }
        _ => PersistError::Io {
            key: key.to_string(),
            operation,
            source: e,
        },
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    values: BTreeMap<String, String>,
    quota: Option<usize>,
    unavailable: bool,
    writes: usize,
}

/// In-process storage
///
/// Clones share the same values, so a test can keep a handle after passing
/// one to a workspace.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects writes that would make the stored values exceed `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        let storage = Self::default();
        storage.inner.borrow_mut().quota = Some(bytes);
        storage
    }

    /// Makes every operation fail with [`PersistError::Unavailable`]
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.borrow_mut().unavailable = unavailable;
    }

    /// Stores a value directly, bypassing quota and write counting
    pub fn seed(&self, key: &str, value: &str) {
        self.inner
            .borrow_mut()
            .values
            .insert(key.to_string(), value.to_string());
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.inner.borrow().values.get(key).cloned()
    }

    /// Number of successful `set` calls
    pub fn write_count(&self) -> usize {
        self.inner.borrow().writes
    }

    fn check_available(&self) -> Result<(), PersistError> {
        if self.inner.borrow().unavailable {
            return Err(PersistError::Unavailable(
                "in-memory storage switched off".to_string(),
            ));
        }
        Ok(())
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        self.check_available()?;
        Ok(self.value(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.check_available()?;
        let mut inner = self.inner.borrow_mut();

        if let Some(quota) = inner.quota {
            let others: usize = inner
                .values
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            if others + value.len() > quota {
                return Err(PersistError::QuotaExceeded {
                    key: key.to_string(),
                });
            }
        }

        inner.values.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        self.check_available()?;
        self.inner.borrow_mut().values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_round_trip() {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::new(temp.path().join("data"));

        assert_eq!(storage.get("editorSettingsV2").unwrap(), None);
        storage.set("editorSettingsV2", "{\"a\":1}").unwrap();
        assert_eq!(
            storage.get("editorSettingsV2").unwrap().as_deref(),
            Some("{\"a\":1}")
        );
        assert!(storage.path_for("editorSettingsV2").ends_with("editorSettingsV2.json"));

        storage.set("editorSettingsV2", "{}").unwrap();
        assert_eq!(storage.get("editorSettingsV2").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_file_storage_remove_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::new(temp.path());

        storage.set("inputAreasV2", "[]").unwrap();
        storage.remove("inputAreasV2").unwrap();
        storage.remove("inputAreasV2").unwrap();
        assert_eq!(storage.get("inputAreasV2").unwrap(), None);
    }

    #[test]
    fn test_file_storage_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::new(temp.path());
        storage.set("outputBufferV2", "\"<p>x</p>\"").unwrap();

        let names: Vec<String> = fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(names.contains(&"outputBufferV2.json".to_string()));
        assert!(names.iter().all(|n| n.ends_with(".json") || n == ".lock"), "{:?}", names);
    }

    #[test]
    fn test_memory_quota() {
        let mut storage = MemoryStorage::with_quota(10);
        storage.set("a", "12345").unwrap();
        storage.set("a", "1234567890").unwrap();

        let err = storage.set("b", "x").unwrap_err();
        assert!(matches!(err, PersistError::QuotaExceeded { ref key } if key == "b"));
        assert_eq!(storage.write_count(), 2);
    }

    #[test]
    fn test_memory_unavailable() {
        let mut storage = MemoryStorage::new();
        let handle = storage.clone();
        handle.set_unavailable(true);

        assert!(matches!(storage.get("a"), Err(PersistError::Unavailable(_))));
        assert!(matches!(storage.set("a", "1"), Err(PersistError::Unavailable(_))));

        handle.set_unavailable(false);
        storage.set("a", "1").unwrap();
        assert_eq!(handle.value("a").as_deref(), Some("1"));
    }

    #[test]
    fn test_error_codes() {
        let err = PersistError::TooLarge {
            size: 10,
            limit: 5,
        };
        assert!(err.to_string().starts_with("DATA_TOO_LARGE:"));

        let err = classify("k", "write", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, PersistError::Unavailable(_)));
    }
}
