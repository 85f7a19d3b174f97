//! Driving port for uploading medicines.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Category, Email, Error, Medicine, MedicineName, PickupLocation, Quantity};

/// Validated upload input.
#[derive(Debug, Clone)]
pub struct UploadMedicineRequest {
    pub owner: Email,
    pub name: MedicineName,
    pub category: Category,
    pub quantity: Quantity,
    pub location: PickupLocation,
    pub expires_at: DateTime<Utc>,
    pub image_ref: Option<String>,
}

/// What happened to the immediate expiry alert for an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadAlert {
    /// Expiry is outside the alert window.
    NotNeeded,
    Delivered,
    /// Messaging is not configured.
    Skipped,
    Failed,
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedMedicine {
    pub medicine: Medicine,
    pub alert: UploadAlert,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MedicinesCommand: Send + Sync {
    async fn upload(&self, request: UploadMedicineRequest) -> Result<UploadedMedicine, Error>;
}
