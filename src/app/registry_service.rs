//! Operation boundary between callers and the registry.
//!
//! Every user-triggered operation publishes a pending status, runs against the registry and
//! converts the outcome into a transient success or error status. Errors are still returned so
//! the transport layer can pick a response code; none of them is fatal to the service.

use crate::app::status::{StatusBoard, TransactionStatus};
use crate::domain::access::{is_owner, DecryptionGrant, WalletSigner};
use crate::domain::error::{RegistryError, RegistryResult};
use crate::domain::project::{ProjectDraft, ProjectRecord};
use crate::domain::query::{top_contributors, ContributorEntry, RegistryStats};
use crate::domain::registry::ProjectRegistry;
use tracing::{error, info};

/// Shares allocated by a one-click investment.
pub const DEFAULT_INVESTMENT_SHARES: u64 = 100;

const REJECTED_MESSAGE: &str = "Transaction rejected by user";

pub struct RegistryService {
    registry: ProjectRegistry,
    status: StatusBoard,
}

impl RegistryService {
    pub fn new(registry: ProjectRegistry) -> Self {
        Self::with_status_board(registry, StatusBoard::default())
    }

    pub fn with_status_board(registry: ProjectRegistry, status: StatusBoard) -> Self {
        Self { registry, status }
    }

    pub fn registry(&self) -> &ProjectRegistry {
        &self.registry
    }

    pub async fn status(&self) -> TransactionStatus {
        self.status.current().await
    }

    /// Best-effort listing; failures are logged and yield an empty list.
    pub async fn load_projects(&self) -> Vec<ProjectRecord> {
        match self.registry.list().await {
            Ok(projects) => projects,
            Err(e) => {
                error!(error = %e, "error loading projects");
                Vec::new()
            }
        }
    }

    pub async fn stats(&self) -> RegistryStats {
        RegistryStats::from_projects(&self.load_projects().await)
    }

    pub async fn top_contributors(&self, limit: usize) -> Vec<ContributorEntry> {
        top_contributors(&self.load_projects().await, limit)
    }

    pub async fn submit_project(
        &self,
        draft: ProjectDraft,
        signer: &dyn WalletSigner,
    ) -> RegistryResult<ProjectRecord> {
        self.status.pending("Encrypting shares with FHE...").await;
        match self.registry.create(draft, signer).await {
            Ok(record) => {
                self.status
                    .success("Project created with FHE-encrypted shares!")
                    .await;
                Ok(record)
            }
            Err(e) => {
                self.report_failure("Submission failed", &e).await;
                Err(e)
            }
        }
    }

    /// Rejects the project's owner before touching the registry.
    pub async fn invest_in_project(
        &self,
        project_id: &str,
        shares: u64,
        signer: &dyn WalletSigner,
    ) -> RegistryResult<ProjectRecord> {
        self.status
            .pending("Processing FHE-encrypted investment...")
            .await;
        match self.try_invest(project_id, shares, signer).await {
            Ok(record) => {
                self.status
                    .success("Investment recorded with FHE encryption!")
                    .await;
                Ok(record)
            }
            Err(e) => {
                self.report_failure("Investment failed", &e).await;
                Err(e)
            }
        }
    }

    pub async fn decrypt_with_signature(
        &self,
        encrypted: &str,
        grant: &DecryptionGrant,
        signer: &dyn WalletSigner,
    ) -> RegistryResult<f64> {
        match self.registry.decrypt(encrypted, grant, signer).await {
            Ok(value) => Ok(value),
            Err(e) => {
                self.report_failure("Decryption failed", &e).await;
                Err(e)
            }
        }
    }

    async fn try_invest(
        &self,
        project_id: &str,
        shares: u64,
        signer: &dyn WalletSigner,
    ) -> RegistryResult<ProjectRecord> {
        let address = signer.address().ok_or(RegistryError::WalletNotConnected)?;
        if shares == 0 {
            return Err(RegistryError::InvalidShares("shares must be positive".to_string()));
        }
        let project = self.registry.get(project_id).await?;
        if is_owner(&address, &project.owner) {
            return Err(RegistryError::OwnerInvestment);
        }
        self.registry.invest_in_record(project, shares, signer).await
    }

    async fn report_failure(&self, action: &str, e: &RegistryError) {
        let message = failure_message(action, e);
        info!(%action, error = %e, "operation failed");
        self.status.error(message).await;
    }
}

/// User-facing text for a failed operation.
pub fn failure_message(action: &str, e: &RegistryError) -> String {
    if e.is_user_rejection() {
        REJECTED_MESSAGE.to_string()
    } else {
        format!("{}: {}", action, e)
    }
}
