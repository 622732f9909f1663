use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quote_core::{DraftStore, StoreError};
use sqlx::{
    Row,
    sqlite::{SqlitePool, SqlitePoolOptions},
};
use tracing::debug;

/// Turns a configured connection string into a sqlx URL.
///
/// * `":memory:"` becomes `sqlite::memory:`.
/// * Values already starting with `sqlite:` are used unchanged.
/// * Anything else is a file path, created on first use.
pub fn database_url(connection_string: &str) -> String {
    match connection_string {
        ":memory:" => "sqlite::memory:".to_string(),
        url if url.starts_with("sqlite:") => url.to_string(),
        path => format!("sqlite:{path}?mode=rwc"),
    }
}

/// Draft slots kept in a SQLite table, one row per key.
pub struct SqliteDraftStore {
    pool: SqlitePool,
}

impl SqliteDraftStore {
    /// Opens the database behind `connection_string`.
    ///
    /// The pool holds a single connection that never expires, so an
    /// in-memory database lives as long as the store.
    pub async fn new(connection_string: &str) -> Result<Self> {
        let url = database_url(connection_string);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(&url)
            .await
            .with_context(|| format!("Failed to connect to database: {}", url))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// When `key` was last written, if it holds a draft.
    pub async fn last_written(
        &self,
        key: &str,
    ) -> Result<Option<DateTime<Utc>>, StoreError> {
        let row = sqlx::query("SELECT updated_at FROM draft_slot WHERE slot_key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        row.map(|row| {
            row.try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| StoreError::Storage(format!("Failed to get updated_at: {}", e)))
        })
        .transpose()
    }
}

#[async_trait]
impl DraftStore for SqliteDraftStore {
    async fn read(
        &self,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        let row = sqlx::query("SELECT payload FROM draft_slot WHERE slot_key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        row.map(|row| {
            row.try_get::<String, _>("payload")
                .map_err(|e| StoreError::Storage(e.to_string()))
        })
        .transpose()
    }

    async fn write(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO draft_slot (slot_key, payload, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(slot_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(e.to_string()))?;

        debug!(key, bytes = value.len(), "draft slot written");
        Ok(())
    }

    async fn remove(
        &self,
        key: &str,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM draft_slot WHERE slot_key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        debug!(key, removed = result.rows_affected(), "draft slot removed");
        Ok(())
    }
}
