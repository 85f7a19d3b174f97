//! Driving port for sharing medicines to the community pool.

use async_trait::async_trait;

use crate::domain::{CommunityEntry, Email, Error, MedicineId};

/// Share request: `contributor` offers `medicine_id` to the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareMedicineRequest {
    pub contributor: Email,
    pub medicine_id: MedicineId,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommunityCommand: Send + Sync {
    /// Snapshot the medicine into the pool; sharing twice is a conflict.
    async fn share(&self, request: ShareMedicineRequest) -> Result<CommunityEntry, Error>;
}
