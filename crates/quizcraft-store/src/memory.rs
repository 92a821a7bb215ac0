//! Process-local `KeyValueStore`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use quizcraft_core::error::DomainError;
use quizcraft_core::store::KeyValueStore;

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Vec<u8>>,
    lists: HashMap<String, Vec<String>>,
}

/// In-memory store. Lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, DomainError> {
        self.inner
            .lock()
            .map_err(|_| DomainError::Persistence("memory store mutex poisoned".into()))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DomainError> {
        Ok(self.lock()?.entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), DomainError> {
        self.lock()?.entries.insert(key.to_owned(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        self.lock()?.entries.remove(key);
        Ok(())
    }

    async fn add_to_list(&self, list: &str, id: &str) -> Result<bool, DomainError> {
        let mut inner = self.lock()?;
        let members = inner.lists.entry(list.to_owned()).or_default();
        if members.iter().any(|member| member == id) {
            return Ok(false);
        }
        members.push(id.to_owned());
        Ok(true)
    }

    async fn remove_from_list(&self, list: &str, id: &str) -> Result<bool, DomainError> {
        let mut inner = self.lock()?;
        let Some(members) = inner.lists.get_mut(list) else {
            return Ok(false);
        };
        let before = members.len();
        members.retain(|member| member != id);
        Ok(members.len() != before)
    }

    async fn list_members(&self, list: &str) -> Result<Vec<String>, DomainError> {
        Ok(self.lock()?.lists.get(list).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_returns_none_for_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.get("quiz:missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites_and_delete_removes() {
        let store = MemoryStore::new();
        store.set("k", b"one".to_vec()).await.unwrap();
        store.set("k", b"two".to_vec()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"two".to_vec()));

        store.delete("k").await.unwrap();
        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_add_to_list_is_idempotent_and_ordered() {
        // Arrange
        let store = MemoryStore::new();

        // Act
        assert!(store.add_to_list("catalog:quizzes", "b").await.unwrap());
        assert!(store.add_to_list("catalog:quizzes", "a").await.unwrap());
        assert!(!store.add_to_list("catalog:quizzes", "b").await.unwrap());

        // Assert
        assert_eq!(
            store.list_members("catalog:quizzes").await.unwrap(),
            vec!["b".to_owned(), "a".to_owned()]
        );
    }

    #[tokio::test]
    async fn test_remove_from_list_reports_presence() {
        let store = MemoryStore::new();
        store.add_to_list("l", "x").await.unwrap();

        assert!(store.remove_from_list("l", "x").await.unwrap());
        assert!(!store.remove_from_list("l", "x").await.unwrap());
        assert!(!store.remove_from_list("other", "x").await.unwrap());
        assert!(store.list_members("l").await.unwrap().is_empty());
    }
}
