//! Driven port for medicine persistence.
//!
//! Full scans return one result per stored record so a single undecodable
//! row does not hide the others from the expiry scanner.

use async_trait::async_trait;

use crate::domain::{Email, Medicine, MedicineId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by medicine repository adapters.
    pub enum MedicineRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "medicine repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "medicine repository query failed: {message}",
    }
}

/// A stored record that could not be turned into a [`Medicine`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("medicine record {record_id} is invalid: {reason}")]
pub struct MedicineRecordError {
    pub record_id: String,
    pub reason: String,
}

impl MedicineRecordError {
    pub fn new(record_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            reason: reason.into(),
        }
    }
}

/// One decoded (or undecodable) record from a full scan.
pub type MedicineRecord = Result<Medicine, MedicineRecordError>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MedicineRepository: Send + Sync {
    async fn insert(&self, medicine: &Medicine) -> Result<(), MedicineRepositoryError>;

    async fn find_by_id(&self, id: &MedicineId) -> Result<Option<Medicine>, MedicineRepositoryError>;

    /// Medicines owned by `owner`, soonest expiry first.
    async fn list_for_owner(&self, owner: &Email) -> Result<Vec<Medicine>, MedicineRepositoryError>;

    /// Every stored record, decoded individually.
    async fn scan_all(&self) -> Result<Vec<MedicineRecord>, MedicineRepositoryError>;
}
