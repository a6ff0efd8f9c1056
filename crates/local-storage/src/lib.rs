//! Durable client-side key-value storage.
//!
//! Values are kept in memory and mirrored to a single JSON document inside a
//! capability-scoped directory. Every mutation rewrites the document
//! atomically, so readers never observe a half-written file and a restart
//! sees exactly the last committed state.
//!
//! # Example
//!
//! ```
//! use camino::Utf8Path;
//! use local_storage::LocalStorage;
//!
//! let tmp = tempfile::tempdir().expect("temp dir");
//! let root = Utf8Path::from_path(tmp.path()).expect("utf-8 temp path");
//!
//! let mut storage = LocalStorage::open(root).expect("open storage");
//! storage.set("token", "abc").expect("persist token");
//!
//! let reopened = LocalStorage::open(root).expect("reopen storage");
//! assert_eq!(reopened.get("token"), Some("abc"));
//! ```

mod atomic_io;
mod error;

use std::collections::BTreeMap;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;

pub use error::LocalStorageError;

/// File name of the storage document inside the storage directory.
pub const DEFAULT_DOCUMENT_NAME: &str = "local-storage.json";

/// Suffix appended to a malformed document when it is set aside.
pub const SET_ASIDE_SUFFIX: &str = ".corrupt";

/// Key-value store persisted as one JSON object of string values.
#[derive(Debug)]
pub struct LocalStorage {
    dir: Dir,
    document: Utf8PathBuf,
    entries: BTreeMap<String, String>,
}

impl LocalStorage {
    /// Open (creating if needed) the storage directory at `root` and load the
    /// default document.
    ///
    /// # Errors
    ///
    /// Returns [`LocalStorageError::OpenDir`] when the directory cannot be
    /// created or opened, and read/parse errors when an existing document is
    /// unreadable.
    pub fn open(root: &Utf8Path) -> Result<Self, LocalStorageError> {
        Self::open_in(open_root(root)?, Utf8Path::new(DEFAULT_DOCUMENT_NAME))
    }

    /// Open like [`LocalStorage::open`], but recover from a malformed
    /// document.
    ///
    /// A document that is not a JSON object of strings is renamed to
    /// `local-storage.json.corrupt` and the store starts empty. The parse
    /// error is handed back alongside the store.
    ///
    /// # Errors
    ///
    /// Returns [`LocalStorageError::OpenDir`] or [`LocalStorageError::Read`]
    /// as [`LocalStorage::open`] does, and [`LocalStorageError::Write`] when
    /// the malformed document cannot be moved.
    pub fn open_or_set_aside(
        root: &Utf8Path,
    ) -> Result<(Self, Option<LocalStorageError>), LocalStorageError> {
        let dir = open_root(root)?;
        let document = Utf8PathBuf::from(DEFAULT_DOCUMENT_NAME);
        match load_entries(&dir, &document) {
            Ok(entries) => Ok((
                Self {
                    dir,
                    document,
                    entries,
                },
                None,
            )),
            Err(err @ LocalStorageError::Parse { .. }) => {
                let aside = Utf8PathBuf::from(format!("{document}{SET_ASIDE_SUFFIX}"));
                dir.rename(&document, &dir, &aside)
                    .map_err(|io_err| LocalStorageError::Write {
                        path: aside.clone(),
                        message: io_err.to_string(),
                    })?;
                let storage = Self {
                    dir,
                    document,
                    entries: BTreeMap::new(),
                };
                Ok((storage, Some(err)))
            }
            Err(err) => Err(err),
        }
    }

    /// Load `document` from an already opened directory handle.
    ///
    /// A missing document yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`LocalStorageError::Read`] or [`LocalStorageError::Parse`]
    /// when an existing document cannot be loaded.
    pub fn open_in(dir: Dir, document: &Utf8Path) -> Result<Self, LocalStorageError> {
        let entries = load_entries(&dir, document)?;
        Ok(Self {
            dir,
            document: document.to_path_buf(),
            entries,
        })
    }

    /// Return the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Store `value` under `key` and persist the document.
    ///
    /// # Errors
    ///
    /// Returns [`LocalStorageError::Write`] when the document cannot be
    /// persisted; the in-memory entry is rolled back in that case.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), LocalStorageError> {
        let previous = self.entries.insert(key.to_owned(), value.to_owned());
        if let Err(err) = self.flush() {
            match previous {
                Some(old) => self.entries.insert(key.to_owned(), old),
                None => self.entries.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }

    /// Remove `key`, returning its previous value.
    ///
    /// Removing an absent key does not touch the disk.
    ///
    /// # Errors
    ///
    /// Returns [`LocalStorageError::Write`] when the document cannot be
    /// persisted; the entry is restored in that case.
    pub fn remove(&mut self, key: &str) -> Result<Option<String>, LocalStorageError> {
        let Some(previous) = self.entries.remove(key) else {
            return Ok(None);
        };
        if let Err(err) = self.flush() {
            self.entries.insert(key.to_owned(), previous);
            return Err(err);
        }
        Ok(Some(previous))
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn flush(&self) -> Result<(), LocalStorageError> {
        let contents =
            serde_json::to_string_pretty(&self.entries).map_err(|err| LocalStorageError::Write {
                path: self.document.clone(),
                message: err.to_string(),
            })?;
        atomic_io::write_atomic(&self.dir, &self.document, &contents)
    }
}

fn open_root(root: &Utf8Path) -> Result<Dir, LocalStorageError> {
    let open_dir = |err: io::Error| LocalStorageError::OpenDir {
        path: root.to_path_buf(),
        message: err.to_string(),
    };
    Dir::create_ambient_dir_all(root, ambient_authority()).map_err(open_dir)?;
    Dir::open_ambient_dir(root, ambient_authority()).map_err(open_dir)
}

fn load_entries(
    dir: &Dir,
    document: &Utf8Path,
) -> Result<BTreeMap<String, String>, LocalStorageError> {
    let contents = match dir.read_to_string(document) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(err) => {
            return Err(LocalStorageError::Read {
                path: document.to_path_buf(),
                message: err.to_string(),
            });
        }
    };
    if contents.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(&contents).map_err(|err| LocalStorageError::Parse {
        path: document.to_path_buf(),
        message: err.to_string(),
    })
}
