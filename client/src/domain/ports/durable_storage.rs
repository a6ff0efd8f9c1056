//! Driven port for client-local key-value storage that survives restarts.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::define_port_error;

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the JSON-encoded user profile.
pub const USER_INFO_KEY: &str = "userInfo";

define_port_error! {
    /// Errors surfaced by durable storage adapters.
    pub enum StorageError {
        /// The backing store could not be read.
        Read { message: String } =>
            "storage read failed: {message}",
        /// The backing store could not be written.
        Write { message: String } =>
            "storage write failed: {message}",
    }
}

/// Port for string key-value storage.
///
/// Calls are synchronous and short; implementations must not block on the
/// network.
#[cfg_attr(test, mockall::automock)]
pub trait DurableStorage: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`; deleting an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local storage for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl InMemoryStorage {
    /// Build a store pre-populated with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
        }
    }

    /// Whether no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DurableStorage for InMemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the in-memory store.
    use super::*;

    #[test]
    fn stores_and_removes_values() {
        let storage = InMemoryStorage::default();
        storage.set(TOKEN_KEY, "abc").expect("set");
        assert_eq!(storage.get(TOKEN_KEY).expect("get"), Some("abc".to_owned()));

        storage.remove(TOKEN_KEY).expect("remove");
        storage.remove(TOKEN_KEY).expect("removing twice is fine");
        assert!(storage.is_empty());
    }

    #[test]
    fn seeded_entries_are_visible() {
        let storage = InMemoryStorage::with_entries([(TOKEN_KEY, "t"), (USER_INFO_KEY, "{}")]);
        assert_eq!(storage.get(USER_INFO_KEY).expect("get"), Some("{}".to_owned()));
    }
}
