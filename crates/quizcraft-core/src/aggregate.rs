//! Aggregate root abstraction and storage helpers.
//!
//! Aggregates are stored whole as JSON under `"{kind}:{id}"`. Published
//! aggregates are additionally listed in a [`Catalog`].

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::error::DomainError;
use crate::store::KeyValueStore;

/// Trait for aggregate roots persisted as a single JSON document.
pub trait Aggregate: Serialize + DeserializeOwned + Send + Sync {
    /// Short kind name, used as key prefix and in `NotFound` errors.
    const KIND: &'static str;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Storage key for the aggregate with the given id.
    #[must_use]
    fn storage_key(id: Uuid) -> String {
        format!("{}:{id}", Self::KIND)
    }
}

/// Named catalog of published aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    /// Published quizzes.
    Quizzes,
    /// Published courses.
    Courses,
}

impl Catalog {
    /// Storage key of the catalog list.
    #[must_use]
    pub fn list_key(self) -> &'static str {
        match self {
            Self::Quizzes => "catalog:quizzes",
            Self::Courses => "catalog:courses",
        }
    }
}

/// Loads an aggregate, returning `None` when it does not exist.
///
/// # Errors
///
/// Returns `DomainError::Persistence` if the store fails or the stored value
/// cannot be decoded.
pub async fn load<A: Aggregate>(
    store: &dyn KeyValueStore,
    id: Uuid,
) -> Result<Option<A>, DomainError> {
    let key = A::storage_key(id);
    match store.get(&key).await? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => {
            debug!(%key, "aggregate not found");
            Ok(None)
        }
    }
}

/// Loads an aggregate that must exist.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the aggregate is absent, or
/// `DomainError::Persistence` if the store fails.
pub async fn load_existing<A: Aggregate>(
    store: &dyn KeyValueStore,
    id: Uuid,
) -> Result<A, DomainError> {
    load(store, id)
        .await?
        .ok_or_else(|| DomainError::not_found(A::KIND, id))
}

/// Writes the aggregate back under its storage key.
///
/// # Errors
///
/// Returns `DomainError::Persistence` if encoding or the store fails.
pub async fn save<A: Aggregate>(
    store: &dyn KeyValueStore,
    aggregate: &A,
) -> Result<(), DomainError> {
    let bytes = serde_json::to_vec(aggregate)?;
    store
        .set(&A::storage_key(aggregate.aggregate_id()), bytes)
        .await
}

/// Deletes the aggregate's stored value. Missing values are not an error.
///
/// # Errors
///
/// Returns `DomainError::Persistence` if the store fails.
pub async fn delete<A: Aggregate>(store: &dyn KeyValueStore, id: Uuid) -> Result<(), DomainError> {
    store.delete(&A::storage_key(id)).await
}
