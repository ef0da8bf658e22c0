pub mod access;
pub mod error;
pub mod project;
pub mod query;
pub mod registry;

pub use access::{DecryptionGrant, PresignedSigner, SignerError, WalletSigner};
pub use error::{RegistryError, RegistryResult};
pub use project::{Category, Contributor, ProjectDraft, ProjectRecord};
pub use registry::{ProjectRegistry, RegistrySettings};
