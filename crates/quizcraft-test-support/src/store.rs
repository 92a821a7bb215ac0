//! Test stores: `KeyValueStore` doubles for handler tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use quizcraft_core::error::DomainError;
use quizcraft_core::store::KeyValueStore;

/// An in-memory store that also records every key written or deleted, in
/// call order.
#[derive(Debug, Default)]
pub struct RecordingStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    lists: Mutex<HashMap<String, Vec<String>>>,
    writes: Mutex<Vec<String>>,
    deletes: Mutex<Vec<String>>,
}

impl RecordingStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys passed to `set`, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }

    /// Keys passed to `delete`, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }

    /// Whether a value is currently stored under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }
}

#[async_trait]
impl KeyValueStore for RecordingStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DomainError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), DomainError> {
        self.writes.lock().unwrap().push(key.to_owned());
        self.entries.lock().unwrap().insert(key.to_owned(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        self.deletes.lock().unwrap().push(key.to_owned());
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn add_to_list(&self, list: &str, id: &str) -> Result<bool, DomainError> {
        let mut lists = self.lists.lock().unwrap();
        let members = lists.entry(list.to_owned()).or_default();
        if members.iter().any(|m| m == id) {
            return Ok(false);
        }
        members.push(id.to_owned());
        Ok(true)
    }

    async fn remove_from_list(&self, list: &str, id: &str) -> Result<bool, DomainError> {
        let mut lists = self.lists.lock().unwrap();
        let Some(members) = lists.get_mut(list) else {
            return Ok(false);
        };
        let before = members.len();
        members.retain(|m| m != id);
        Ok(before != members.len())
    }

    async fn list_members(&self, list: &str) -> Result<Vec<String>, DomainError> {
        Ok(self
            .lists
            .lock()
            .unwrap()
            .get(list)
            .cloned()
            .unwrap_or_default())
    }
}

/// A store whose every call fails with a persistence error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingStore;

fn refused() -> DomainError {
    DomainError::Persistence("connection refused".into())
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, DomainError> {
        Err(refused())
    }

    async fn set(&self, _key: &str, _value: Vec<u8>) -> Result<(), DomainError> {
        Err(refused())
    }

    async fn delete(&self, _key: &str) -> Result<(), DomainError> {
        Err(refused())
    }

    async fn add_to_list(&self, _list: &str, _id: &str) -> Result<bool, DomainError> {
        Err(refused())
    }

    async fn remove_from_list(&self, _list: &str, _id: &str) -> Result<bool, DomainError> {
        Err(refused())
    }

    async fn list_members(&self, _list: &str) -> Result<Vec<String>, DomainError> {
        Err(refused())
    }
}
