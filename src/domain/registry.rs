//! The project registry: an index key plus one record key per project, layered over a generic
//! key/value contract store.
//!
//! Every operation is a sequence of independently committed remote calls. Nothing here locks,
//! retries or reconciles:
//! - `create` writes the record and then read-modify-writes the index. A failure between the two
//!   leaves an orphan record that `list` never shows.
//! - `invest` read-modify-writes the whole record. Concurrent investors race and the last
//!   writer wins.

use crate::crypto::fhe;
use crate::domain::access::{DecryptionGrant, WalletSigner};
use crate::domain::error::{RegistryError, RegistryResult};
use crate::domain::project::{
    generate_project_id, parse_index, record_key, serialize_index, Contributor, ProjectDraft,
    ProjectRecord, INDEX_KEY,
};
use crate::storage::kv::KeyValueStore;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Artificial pause before a decrypted value is released.
pub const DEFAULT_DECRYPT_DELAY: Duration = Duration::from_millis(1500);

/// Attempts at drawing an id that is not already in the index.
const MAX_ID_ATTEMPTS: usize = 8;

#[derive(Debug, Clone)]
pub struct RegistrySettings {
    pub contract_address: String,
    pub chain_id: u64,
    pub decrypt_delay: Duration,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            contract_address: "0x0000000000000000000000000000000000000000".to_string(),
            chain_id: 11155111,
            decrypt_delay: DEFAULT_DECRYPT_DELAY,
        }
    }
}

pub struct ProjectRegistry {
    store: Arc<dyn KeyValueStore>,
    settings: RegistrySettings,
}

impl ProjectRegistry {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_settings(store, RegistrySettings::default())
    }

    pub fn with_settings(store: Arc<dyn KeyValueStore>, settings: RegistrySettings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub fn settings(&self) -> &RegistrySettings {
        &self.settings
    }

    /// Issues decryption grant parameters bound to this registry's contract and chain.
    pub fn issue_grant(&self) -> DecryptionGrant {
        DecryptionGrant::issue(
            self.settings.contract_address.clone(),
            self.settings.chain_id,
            Utc::now().timestamp(),
        )
    }

    /// Lists every readable project, newest first.
    ///
    /// Best effort: an unavailable store or a missing/corrupt index yields an empty list, and any
    /// record that cannot be read or parsed is skipped.
    pub async fn list(&self) -> RegistryResult<Vec<ProjectRecord>> {
        match self.store.is_available().await {
            Ok(true) => {}
            Ok(false) => {
                info!(backend = self.store.backend_name(), "store unavailable, listing nothing");
                return Ok(Vec::new());
            }
            Err(e) => {
                warn!(error = %e, "availability check failed, listing nothing");
                return Ok(Vec::new());
            }
        }

        let ids = match self.store.get_data(INDEX_KEY).await {
            Ok(bytes) => parse_index(&bytes).unwrap_or_else(|reason| {
                warn!(key = INDEX_KEY, %reason, "unreadable project index");
                Vec::new()
            }),
            Err(e) => {
                warn!(key = INDEX_KEY, error = %e, "failed to load project index");
                return Ok(Vec::new());
            }
        };

        let mut projects = Vec::with_capacity(ids.len());
        for id in &ids {
            match self.read_record(id).await {
                Ok(Some(record)) => projects.push(record),
                Ok(None) => warn!(project_id = %id, "indexed project has no record, skipping"),
                Err(e) => warn!(project_id = %id, error = %e, "skipping project"),
            }
        }

        projects.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        debug!(indexed = ids.len(), listed = projects.len(), "listed projects");
        Ok(projects)
    }

    /// Reads a single project.
    pub async fn get(&self, project_id: &str) -> RegistryResult<ProjectRecord> {
        self.read_record(project_id)
            .await?
            .ok_or_else(|| RegistryError::ProjectNotFound(project_id.to_string()))
    }

    /// Publishes a new project owned by the signer's address.
    pub async fn create(
        &self,
        draft: ProjectDraft,
        signer: &dyn WalletSigner,
    ) -> RegistryResult<ProjectRecord> {
        let owner = signer.address().ok_or(RegistryError::WalletNotConnected)?;
        draft.validate().map_err(RegistryError::InvalidDraft)?;

        let known_ids = self.load_index_for_update().await?;
        let id = fresh_id(&known_ids, generate_project_id).ok_or(RegistryError::IdCollision)?;

        let record = ProjectRecord {
            id: id.clone(),
            name: draft.name,
            description: draft.description,
            encrypted_shares: fhe::encode(draft.total_shares),
            total_shares: draft.total_shares,
            owner,
            timestamp: Utc::now().timestamp(),
            category: draft.category.to_string(),
            contributors: Vec::new(),
        };

        let receipt = self.write_record(&record).await?;
        debug!(project_id = %id, tx = %receipt.tx_hash, "record written");

        // Re-read right before appending to keep the lost-update window short.
        let mut ids = self.load_index_for_update().await?;
        ids.push(id.clone());
        let receipt = self.store.set_data(INDEX_KEY, &serialize_index(&ids)).await?;
        info!(project_id = %id, tx = %receipt.tx_hash, indexed = ids.len(), "project created");

        Ok(record)
    }

    /// Records a share allocation for the signer's address.
    pub async fn invest(
        &self,
        project_id: &str,
        shares: u64,
        signer: &dyn WalletSigner,
    ) -> RegistryResult<ProjectRecord> {
        if signer.address().is_none() {
            return Err(RegistryError::WalletNotConnected);
        }
        let record = self.get(project_id).await?;
        self.invest_in_record(record, shares, signer).await
    }

    /// Same as [`invest`](Self::invest), starting from a record the caller already read.
    ///
    /// Saves one round trip; the record is still written back whole, so it is only as fresh as
    /// the caller's read.
    pub async fn invest_in_record(
        &self,
        mut record: ProjectRecord,
        shares: u64,
        signer: &dyn WalletSigner,
    ) -> RegistryResult<ProjectRecord> {
        let address = signer.address().ok_or(RegistryError::WalletNotConnected)?;
        let project_id = record.id.clone();

        if record.contribution_of(&address).is_some() {
            return Err(RegistryError::DuplicateContribution {
                project_id,
                address,
            });
        }
        if record.total_shares == 0 {
            return Err(RegistryError::InvalidShares(
                "project has no shares to allocate".to_string(),
            ));
        }

        let percentage = shares as f64 / record.total_shares as f64 * 100.0;
        record.contributors.push(Contributor {
            address: address.clone(),
            encrypted_shares: fhe::encode(shares),
            percentage,
        });

        let receipt = self.write_record(&record).await?;
        info!(
            %project_id,
            %address,
            percentage,
            tx = %receipt.tx_hash,
            "investment recorded"
        );
        Ok(record)
    }

    /// Decodes an encrypted value once the wallet has signed the grant message.
    pub async fn decrypt(
        &self,
        encrypted: &str,
        grant: &DecryptionGrant,
        signer: &dyn WalletSigner,
    ) -> RegistryResult<f64> {
        if signer.address().is_none() {
            return Err(RegistryError::WalletNotConnected);
        }
        if !grant.is_active(Utc::now().timestamp()) {
            return Err(RegistryError::GrantExpired);
        }

        signer.sign_message(&grant.message()).await?;

        if !self.settings.decrypt_delay.is_zero() {
            tokio::time::sleep(self.settings.decrypt_delay).await;
        }
        Ok(fhe::decode(encrypted)?)
    }

    /// `Ok(None)` when the key is empty. The id always comes from the key.
    async fn read_record(&self, project_id: &str) -> RegistryResult<Option<ProjectRecord>> {
        let key = record_key(project_id);
        let bytes = self.store.get_data(&key).await?;
        if bytes.is_empty() {
            return Ok(None);
        }

        let mut record: ProjectRecord =
            serde_json::from_slice(&bytes).map_err(|e| RegistryError::MalformedRecord {
                key: key.clone(),
                reason: e.to_string(),
            })?;
        if !record.id.is_empty() && record.id != project_id {
            warn!(%key, stored_id = %record.id, "record id does not match its key");
        }
        record.id = project_id.to_string();
        Ok(Some(record))
    }

    async fn write_record(
        &self,
        record: &ProjectRecord,
    ) -> RegistryResult<crate::storage::kv::TxReceipt> {
        let key = record_key(&record.id);
        let bytes = serde_json::to_vec(record).map_err(|e| RegistryError::MalformedRecord {
            key: key.clone(),
            reason: e.to_string(),
        })?;
        Ok(self.store.set_data(&key, &bytes).await?)
    }

    /// A corrupt index is logged and treated as empty; the next write replaces it.
    async fn load_index_for_update(&self) -> RegistryResult<Vec<String>> {
        let bytes = self.store.get_data(INDEX_KEY).await?;
        Ok(parse_index(&bytes).unwrap_or_else(|reason| {
            warn!(key = INDEX_KEY, %reason, "project index unreadable, starting a new one");
            Vec::new()
        }))
    }
}

/// Draws ids until one is not in `known`. `None` after `MAX_ID_ATTEMPTS` collisions.
fn fresh_id<F>(known: &[String], mut generate: F) -> Option<String>
where
    F: FnMut() -> String,
{
    (0..MAX_ID_ATTEMPTS)
        .map(|_| generate())
        .find(|id| !known.contains(id))
}
