//! Driving port for reading medicines.

use async_trait::async_trait;

use crate::domain::{DisposalGuide, Email, Error, Medicine, MedicineId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MedicinesQuery: Send + Sync {
    /// Medicines owned by `owner`, soonest expiry first.
    async fn list_for_owner(&self, owner: &Email) -> Result<Vec<Medicine>, Error>;

    /// Disposal steps for one medicine; unknown ids are not found.
    async fn disposal_guide(&self, id: &MedicineId) -> Result<DisposalGuide, Error>;
}
