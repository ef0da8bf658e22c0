//! Persistent key/value store implementation using PostgreSQL.

use crate::storage::kv::{receipt_hash, KeyValueStore, StoreError, StoreResult, TxReceipt};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

/// A key/value store that uses a PostgreSQL connection pool.
///
/// Every `set_data` is its own statement, so two writes are never committed together.
#[derive(Clone)]
pub struct PostgresKvStore {
    pool: PgPool,
}

impl PostgresKvStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `database_url` and makes sure the backing table exists.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query("CREATE SEQUENCE IF NOT EXISTS kv_tx_seq")
            .execute(&self.pool)
            .await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS kv_entries (
                key TEXT PRIMARY KEY,
                value BYTEA NOT NULL,
                tx_seq BIGINT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for PostgresKvStore {
    fn backend_name(&self) -> &str {
        "postgres"
    }

    async fn is_available(&self) -> StoreResult<bool> {
        Ok(sqlx::query("SELECT 1").execute(&self.pool).await.is_ok())
    }

    async fn get_data(&self, key: &str) -> StoreResult<Vec<u8>> {
        let row = sqlx::query("SELECT value FROM kv_entries WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.into()))?;
        match row {
            Some(row) => row
                .try_get::<Vec<u8>, _>("value")
                .map_err(|e| StoreError::Backend(e.into())),
            None => Ok(Vec::new()),
        }
    }

    async fn set_data(&self, key: &str, value: &[u8]) -> StoreResult<TxReceipt> {
        let seq: i64 = sqlx::query_scalar(
            "INSERT INTO kv_entries (key, value, tx_seq) VALUES ($1, $2, nextval('kv_tx_seq'))
             ON CONFLICT (key) DO UPDATE SET value = $2, tx_seq = nextval('kv_tx_seq')
             RETURNING tx_seq",
        )
        .bind(key)
        .bind(value)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.into()))?;

        Ok(TxReceipt {
            tx_hash: receipt_hash(seq as u64, key, value),
        })
    }
}
