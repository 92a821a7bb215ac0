//! `PostgreSQL` implementation of the `KeyValueStore` trait.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use quizcraft_core::error::DomainError;
use quizcraft_core::store::KeyValueStore;

/// PostgreSQL-backed key-value store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new `PgStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Persistence` if a migration fails.
    pub async fn migrate(&self) -> Result<(), DomainError> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|err| DomainError::Persistence(format!("migration failed: {err}")))?;
        info!("store schema is up to date");
        Ok(())
    }
}

fn persistence(err: sqlx::Error) -> DomainError {
    DomainError::Persistence(err.to_string())
}

#[async_trait]
impl KeyValueStore for PgStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DomainError> {
        sqlx::query_scalar::<_, Vec<u8>>("SELECT value FROM kv_entries WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(persistence)
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), DomainError> {
        sqlx::query(
            r"
            INSERT INTO kv_entries (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE
                SET value = EXCLUDED.value,
                    updated_at = NOW()
            ",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(persistence)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM kv_entries WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(persistence)?;
        Ok(())
    }

    async fn add_to_list(&self, list: &str, id: &str) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r"
            INSERT INTO kv_list_members (list_key, member)
            VALUES ($1, $2)
            ON CONFLICT (list_key, member) DO NOTHING
            ",
        )
        .bind(list)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(persistence)?;
        Ok(result.rows_affected() == 1)
    }

    async fn remove_from_list(&self, list: &str, id: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM kv_list_members WHERE list_key = $1 AND member = $2")
            .bind(list)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(persistence)?;
        Ok(result.rows_affected() == 1)
    }

    async fn list_members(&self, list: &str) -> Result<Vec<String>, DomainError> {
        sqlx::query_scalar::<_, String>(
            "SELECT member FROM kv_list_members WHERE list_key = $1 ORDER BY position",
        )
        .bind(list)
        .fetch_all(&self.pool)
        .await
        .map_err(persistence)
    }
}
