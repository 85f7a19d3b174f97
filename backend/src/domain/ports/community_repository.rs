//! Driven port for the community pool.

use async_trait::async_trait;

use crate::domain::{CommunityEntry, CommunityFilter, Email, MedicineId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by community repository adapters.
    pub enum CommunityRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "community repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "community repository query failed: {message}",
        /// The contributor already shared this medicine.
        AlreadyShared { medicine_id: String, contributor: String } =>
            "medicine {medicine_id} already shared by {contributor}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommunityRepository: Send + Sync {
    /// Insert an entry; the store rejects a second entry for the same
    /// (medicine, contributor) pair with `AlreadyShared`.
    async fn insert(&self, entry: &CommunityEntry) -> Result<(), CommunityRepositoryError>;

    async fn exists(
        &self,
        medicine_id: &MedicineId,
        contributor: &Email,
    ) -> Result<bool, CommunityRepositoryError>;

    /// Entries matching `filter`, ordered by its sort key.
    async fn browse(
        &self,
        filter: &CommunityFilter,
    ) -> Result<Vec<CommunityEntry>, CommunityRepositoryError>;

    /// Every entry in store order (share time, then id).
    async fn list_all(&self) -> Result<Vec<CommunityEntry>, CommunityRepositoryError>;
}
