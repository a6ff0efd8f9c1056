//! File-backed durable storage.

use std::sync::{Mutex, MutexGuard, PoisonError};

use camino::Utf8Path;
use local_storage::{LocalStorage, LocalStorageError};
use tracing::warn;

use crate::domain::ports::{DurableStorage, StorageError};

/// [`DurableStorage`] adapter persisting to a JSON document on disk.
#[derive(Debug)]
pub struct FileDurableStorage {
    inner: Mutex<LocalStorage>,
}

impl FileDurableStorage {
    /// Open (creating if needed) the storage directory at `root`.
    ///
    /// A malformed document is set aside and the client starts signed out.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] when the directory cannot be opened or
    /// the document cannot be read, and [`StorageError::Write`] when a
    /// malformed document cannot be moved aside.
    pub fn open(root: &Utf8Path) -> Result<Self, StorageError> {
        let (storage, discarded) =
            LocalStorage::open_or_set_aside(root).map_err(map_storage_error)?;
        if let Some(error) = discarded {
            warn!(%error, "set aside malformed storage document; starting signed out");
        }
        Ok(Self {
            inner: Mutex::new(storage),
        })
    }

    fn storage(&self) -> MutexGuard<'_, LocalStorage> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DurableStorage for FileDurableStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.storage().get(key).map(str::to_owned))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage().set(key, value).map_err(map_storage_error)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage()
            .remove(key)
            .map(|_| ())
            .map_err(map_storage_error)
    }
}

fn map_storage_error(error: LocalStorageError) -> StorageError {
    match error {
        LocalStorageError::Write { .. } => StorageError::write(error.to_string()),
        LocalStorageError::OpenDir { .. }
        | LocalStorageError::Read { .. }
        | LocalStorageError::Parse { .. } => StorageError::read(error.to_string()),
    }
}
