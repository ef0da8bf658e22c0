pub mod app;
pub mod crypto;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::RegistryService;
pub use crypto::fhe;
pub use domain::{ProjectDraft, ProjectRecord, ProjectRegistry, RegistryError};
pub use storage::kv::{InMemoryKvStore, KeyValueStore};
