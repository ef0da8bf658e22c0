//! Wallet signer seam and the signed-message ritual that gates decryption.
//!
//! The signature is collected but never checked against the ciphertext. It only proves the
//! wallet was willing to sign at that moment.

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Length of the hex body of a generated grant public key.
pub const PUBLIC_KEY_HEX_LEN: usize = 2000;
pub const DEFAULT_GRANT_DURATION_DAYS: u32 = 30;
const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignerError {
    #[error("user rejected the signature request")]
    Rejected,

    #[error("wallet is not connected")]
    NotConnected,
}

/// Connected wallet as seen by the registry.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// `None` when no wallet is connected.
    fn address(&self) -> Option<String>;

    async fn sign_message(&self, message: &str) -> Result<String, SignerError>;
}

/// Parameters the wallet signs before a value may be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DecryptionGrant {
    pub public_key: String,
    pub contract_address: String,
    pub chain_id: u64,
    /// Unix seconds.
    pub start_timestamp: i64,
    pub duration_days: u32,
}

impl DecryptionGrant {
    /// Fresh grant starting at `now` with a random public key.
    pub fn issue(contract_address: impl Into<String>, chain_id: u64, now: i64) -> Self {
        Self {
            public_key: generate_public_key(),
            contract_address: contract_address.into(),
            chain_id,
            start_timestamp: now,
            duration_days: DEFAULT_GRANT_DURATION_DAYS,
        }
    }

    /// The exact text handed to the wallet for signing.
    pub fn message(&self) -> String {
        format!(
            "publickey:{}\ncontractAddresses:{}\ncontractsChainId:{}\n\
             startTimestamp:{}\ndurationDays:{}",
            self.public_key,
            self.contract_address,
            self.chain_id,
            self.start_timestamp,
            self.duration_days
        )
    }

    pub fn expires_at(&self) -> i64 {
        self.start_timestamp + i64::from(self.duration_days) * SECONDS_PER_DAY
    }

    pub fn is_active(&self, now: i64) -> bool {
        self.start_timestamp <= now && now < self.expires_at()
    }
}

/// `0x` followed by 2000 random hex digits.
pub fn generate_public_key() -> String {
    let mut bytes = vec![0u8; PUBLIC_KEY_HEX_LEN / 2];
    rand::thread_rng().fill(bytes.as_mut_slice());
    format!("0x{}", hex::encode(bytes))
}

/// Address equality used to hide the invest action from a project's owner.
pub fn is_owner(address: &str, owner: &str) -> bool {
    address.eq_ignore_ascii_case(owner)
}

/// Signer with a fixed address and pre-collected signature.
///
/// The HTTP layer builds one per request: the browser signs out of band and posts the result.
/// A missing signature behaves like the user dismissing the wallet prompt.
#[derive(Debug, Clone, Default)]
pub struct PresignedSigner {
    address: Option<String>,
    signature: Option<String>,
}

impl PresignedSigner {
    pub fn new(address: Option<String>, signature: Option<String>) -> Self {
        let address = address.filter(|a| !a.trim().is_empty());
        let signature = signature.filter(|s| !s.trim().is_empty());
        Self { address, signature }
    }

    pub fn connected(address: impl Into<String>) -> Self {
        Self::new(Some(address.into()), None)
    }
}

#[async_trait]
impl WalletSigner for PresignedSigner {
    fn address(&self) -> Option<String> {
        self.address.clone()
    }

    async fn sign_message(&self, _message: &str) -> Result<String, SignerError> {
        if self.address.is_none() {
            return Err(SignerError::NotConnected);
        }
        self.signature.clone().ok_or(SignerError::Rejected)
    }
}
