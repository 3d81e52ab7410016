// ABOUTME: Single-slot persistence backends for the favorites store.
// ABOUTME: FileStorage writes one JSON file atomically; MemoryStorage keeps the blob in process.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::StorageError;

/// A named storage slot holding one serialized blob.
pub trait Storage {
    /// Reads the slot. `Ok(None)` means the slot has never been written.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Replaces the slot contents wholesale.
    fn save(&self, blob: &str) -> Result<(), StorageError>;
}

impl<T: Storage + ?Sized> Storage for &T {
    fn load(&self) -> Result<Option<String>, StorageError> {
        (**self).load()
    }

    fn save(&self, blob: &str) -> Result<(), StorageError> {
        (**self).save(blob)
    }
}

/// Stores the slot as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Storage for FileStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, blob: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        // Atomic replace via a sibling temp file
        let tmp = self.temp_path();
        fs::write(&tmp, blob)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-process slot. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
    reject_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a slot pre-filled with `blob`.
    pub fn with_contents(blob: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(blob.into()))),
            reject_writes: false,
        }
    }

    /// Creates a slot whose writes always fail.
    pub fn read_only() -> Self {
        Self {
            slot: Arc::default(),
            reject_writes: true,
        }
    }

    /// Current slot contents.
    pub fn contents(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.contents())
    }

    fn save(&self, blob: &str) -> Result<(), StorageError> {
        if self.reject_writes {
            return Err(StorageError::Unavailable("slot is read-only".to_string()));
        }
        *self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(blob.to_string());
        Ok(())
    }
}
