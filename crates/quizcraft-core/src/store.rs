//! Persistence gateway contract.
//!
//! The engine treats storage as an opaque key-value store plus named,
//! ordered, duplicate-free id lists. Values are JSON-serialized aggregates.

use async_trait::async_trait;

use crate::error::DomainError;

/// Key-value persistence used by every authoring and gameplay operation.
///
/// Implementations report every storage failure as
/// [`DomainError::Persistence`].
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DomainError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), DomainError>;

    /// Removes `key`. Deleting an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<(), DomainError>;

    /// Appends `id` to `list` unless already present. Returns whether it was
    /// added.
    async fn add_to_list(&self, list: &str, id: &str) -> Result<bool, DomainError>;

    /// Removes `id` from `list`. Returns whether it was present.
    async fn remove_from_list(&self, list: &str, id: &str) -> Result<bool, DomainError>;

    /// Returns the members of `list` in insertion order.
    async fn list_members(&self, list: &str) -> Result<Vec<String>, DomainError>;
}
