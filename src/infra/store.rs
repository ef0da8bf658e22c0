//! Builds the configured key/value backend.

use crate::infra::config::StoreBackend;
use crate::storage::kv::{HttpKvStore, InMemoryKvStore, KeyValueStore, PostgresKvStore};
use std::sync::Arc;

pub async fn connect(backend: &StoreBackend) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match backend {
        StoreBackend::Memory => Arc::new(InMemoryKvStore::new()),
        StoreBackend::Postgres { database_url } => {
            Arc::new(PostgresKvStore::connect(database_url).await?)
        }
        StoreBackend::Http { gateway_url } => Arc::new(HttpKvStore::new(gateway_url)?),
    };
    Ok(store)
}
