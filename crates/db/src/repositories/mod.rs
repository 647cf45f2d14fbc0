use async_trait::async_trait;
use thiserror::Error;

use orcapro_core::domain::client::{Client, ClientId};
use orcapro_core::domain::manifest::{DeliveryManifest, ManifestId};
use orcapro_core::domain::proposal::{ProposalId, ProposalRecord};
use orcapro_core::domain::user::{User, UserId};

pub mod client;
pub mod manifest;
pub mod proposal;
pub mod user;

pub use client::SqlClientRepository;
pub use manifest::SqlManifestRepository;
pub use proposal::SqlProposalRepository;
pub use user::{SqlUserRepository, StoredCredentials};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("conflict: {0}")]
    Conflict(String),
}

impl RepositoryError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

pub(crate) fn map_insert_error(error: sqlx::Error, conflict_message: &str) -> RepositoryError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::Conflict(conflict_message.to_string())
        }
        _ => RepositoryError::Database(error),
    }
}

pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[async_trait]
pub trait ProposalRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<ProposalRecord>, RepositoryError>;
    async fn find_by_id(&self, id: &ProposalId) -> Result<Option<ProposalRecord>, RepositoryError>;
    /// Every human-facing number already issued, for the sequencer.
    async fn list_numbers(&self) -> Result<Vec<String>, RepositoryError>;
    async fn create(&self, record: ProposalRecord) -> Result<ProposalRecord, RepositoryError>;
    async fn update(
        &self,
        id: &ProposalId,
        record: ProposalRecord,
    ) -> Result<Option<ProposalRecord>, RepositoryError>;
    async fn delete(&self, id: &ProposalId) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Client>, RepositoryError>;
    async fn find_by_id(&self, id: &ClientId) -> Result<Option<Client>, RepositoryError>;
    async fn create(&self, client: Client) -> Result<Client, RepositoryError>;
    async fn update(&self, id: &ClientId, client: Client)
        -> Result<Option<Client>, RepositoryError>;
    async fn delete(&self, id: &ClientId) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait ManifestRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<DeliveryManifest>, RepositoryError>;
    async fn find_by_id(&self, id: &ManifestId)
        -> Result<Option<DeliveryManifest>, RepositoryError>;
    async fn create(&self, manifest: DeliveryManifest)
        -> Result<DeliveryManifest, RepositoryError>;
    async fn update(
        &self,
        id: &ManifestId,
        manifest: DeliveryManifest,
    ) -> Result<Option<DeliveryManifest>, RepositoryError>;
    async fn delete(&self, id: &ManifestId) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;
    /// Lookup by normalized login, returning the stored password digest
    /// alongside the public user shape.
    async fn find_credentials(
        &self,
        login: &str,
    ) -> Result<Option<StoredCredentials>, RepositoryError>;
    async fn create(
        &self,
        user: User,
        senha_hash: String,
    ) -> Result<User, RepositoryError>;
    async fn update(
        &self,
        id: &UserId,
        user: User,
        senha_hash: Option<String>,
    ) -> Result<Option<User>, RepositoryError>;
    async fn delete(&self, id: &UserId) -> Result<bool, RepositoryError>;
}
