//! In-memory key/value store.
//!
//! Used by tests and the `memory` backend of the API server. It can simulate per-call latency,
//! an unreachable contract, failed writes and wallet rejections so that the registry's failure
//! modes can be exercised without a chain.

use crate::storage::kv::{receipt_hash, KeyValueStore, StoreError, StoreResult, TxReceipt};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryKvStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
    unavailable: AtomicBool,
    latency: Duration,
    failing_writes: RwLock<HashSet<String>>,
    rejected_writes: RwLock<HashSet<String>>,
    write_seq: AtomicU64,
    reads: AtomicU64,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every read and write sleeps for `latency` before touching the map.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Makes subsequent writes to `key` fail with a backend error.
    pub async fn fail_writes_to(&self, key: &str) {
        self.failing_writes.write().await.insert(key.to_string());
    }

    /// Makes subsequent writes to `key` fail as if the user declined to sign.
    pub async fn reject_writes_to(&self, key: &str) {
        self.rejected_writes.write().await.insert(key.to_string());
    }

    pub async fn clear_faults(&self) {
        self.failing_writes.write().await.clear();
        self.rejected_writes.write().await.clear();
    }

    /// Writes raw bytes without fault injection or latency (test seeding).
    pub async fn put_raw(&self, key: &str, value: impl Into<Vec<u8>>) {
        self.entries.write().await.insert(key.to_string(), value.into());
    }

    pub async fn contains_key(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }

    /// Number of committed writes so far.
    pub fn write_count(&self) -> u64 {
        self.write_seq.load(Ordering::SeqCst)
    }

    /// Number of `get_data` calls so far, including failed ones.
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn ensure_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store switched off".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKvStore {
    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn is_available(&self) -> StoreResult<bool> {
        self.simulate_latency().await;
        Ok(!self.unavailable.load(Ordering::SeqCst))
    }

    async fn get_data(&self, key: &str) -> StoreResult<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        self.ensure_available()?;
        Ok(self.entries.read().await.get(key).cloned().unwrap_or_default())
    }

    async fn set_data(&self, key: &str, value: &[u8]) -> StoreResult<TxReceipt> {
        self.simulate_latency().await;
        self.ensure_available()?;

        if self.rejected_writes.read().await.contains(key) {
            return Err(StoreError::Rejected);
        }
        if self.failing_writes.read().await.contains(key) {
            return Err(StoreError::Backend(anyhow::anyhow!(
                "simulated write failure for key '{}'",
                key
            )));
        }

        self.entries.write().await.insert(key.to_string(), value.to_vec());
        let seq = self.write_seq.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(TxReceipt {
            tx_hash: receipt_hash(seq, key, value),
        })
    }
}
