//! Registry error taxonomy.

use crate::crypto::CodecError;
use crate::domain::access::SignerError;
use crate::storage::kv::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("key/value store unavailable: {0}")]
    StoreUnavailable(String),

    #[error(transparent)]
    Store(StoreError),

    #[error("malformed record under '{key}': {reason}")]
    MalformedRecord { key: String, reason: String },

    /// The wallet user declined a signature or transaction.
    #[error("user rejected the request")]
    UserRejected,

    #[error("wallet is not connected")]
    WalletNotConnected,

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("{address} already contributed to project {project_id}")]
    DuplicateContribution { project_id: String, address: String },

    #[error("owner cannot invest in their own project")]
    OwnerInvestment,

    #[error("could not allocate a project id that is not already indexed")]
    IdCollision,

    #[error("invalid project: {0}")]
    InvalidDraft(String),

    #[error("invalid share amount: {0}")]
    InvalidShares(String),

    #[error("decryption grant is outside its validity window")]
    GrantExpired,

    #[error("cannot decode value: {0}")]
    Codec(#[from] CodecError),
}

impl RegistryError {
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, RegistryError::UserRejected)
    }
}

impl From<StoreError> for RegistryError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Rejected => RegistryError::UserRejected,
            StoreError::Unavailable(reason) => RegistryError::StoreUnavailable(reason),
            other => RegistryError::Store(other),
        }
    }
}

impl From<SignerError> for RegistryError {
    fn from(e: SignerError) -> Self {
        match e {
            SignerError::Rejected => RegistryError::UserRejected,
            SignerError::NotConnected => RegistryError::WalletNotConnected,
        }
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;
