//! Key/value contract store abstraction.
//!
//! The registry only ever talks to a generic string-keyed byte store with three calls:
//! availability, read and write. Each write is an independently committed transaction;
//! there is no multi-key atomicity and no compare-and-swap.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod http;
pub mod memory;
pub mod postgres;

pub use http::HttpKvStore;
pub use memory::InMemoryKvStore;
pub use postgres::PostgresKvStore;

/// Receipt returned by a committed `set_data` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: String,
}

#[derive(Error, Debug)]
pub enum StoreError {
    /// The contract is not deployed or not reachable.
    #[error("key/value store unavailable: {0}")]
    Unavailable(String),

    /// The wallet user declined to sign the write transaction.
    #[error("user rejected transaction")]
    Rejected,

    #[error("store backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Contract that any key/value backend must satisfy.
///
/// A key that was never written reads back as an empty byte vector, not an error.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Short backend name used in logs.
    fn backend_name(&self) -> &str;

    async fn is_available(&self) -> StoreResult<bool>;

    async fn get_data(&self, key: &str) -> StoreResult<Vec<u8>>;

    async fn set_data(&self, key: &str, value: &[u8]) -> StoreResult<TxReceipt>;
}

/// Derives a receipt hash from the write sequence number and payload.
pub(crate) fn receipt_hash(seq: u64, key: &str, value: &[u8]) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(seq.to_be_bytes());
    hasher.update(key.as_bytes());
    hasher.update(value);
    format!("0x{}", hex::encode(hasher.finalize()))
}
