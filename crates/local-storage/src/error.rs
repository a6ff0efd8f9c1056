//! Error types for the local-storage crate.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while opening, reading or persisting the storage document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocalStorageError {
    /// The storage directory could not be created or opened.
    #[error("failed to open storage directory '{path}': {message}")]
    OpenDir {
        /// Directory that was requested.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The storage document exists but could not be read.
    #[error("failed to read storage document '{path}': {message}")]
    Read {
        /// Document path relative to the storage directory.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The storage document is not a JSON object of string values.
    #[error("storage document '{path}' is malformed: {message}")]
    Parse {
        /// Document path relative to the storage directory.
        path: Utf8PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Persisting the storage document failed.
    #[error("failed to write storage document '{path}': {message}")]
    Write {
        /// Path of the file being written.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },
}
