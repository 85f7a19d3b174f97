//! Medicine upload, listing and disposal guidance.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    MedicineRepository, MedicinesCommand, MedicinesQuery, UploadAlert, UploadMedicineRequest,
    UploadedMedicine, UserRepository,
};
use crate::domain::repository_error_mapping::{map_medicine_error, map_user_error};
use crate::domain::{
    DispatchOutcome, DisposalGuide, Email, Error, ExpiryWindow, Medicine, MedicineDraft,
    MedicineId, NotificationDispatcher,
};

/// Format the alert sent when an upload is already close to expiry.
pub fn upload_alert_message(medicine: &Medicine) -> String {
    format!(
        "⚠️ Your medicine '{}' is expiring on {}.",
        medicine.name(),
        medicine.expires_at().format("%Y-%m-%d"),
    )
}

/// Implements the medicine driving ports.
#[derive(Clone)]
pub struct MedicineService {
    medicines: Arc<dyn MedicineRepository>,
    users: Arc<dyn UserRepository>,
    dispatcher: Arc<NotificationDispatcher>,
    clock: Arc<dyn Clock>,
    window: ExpiryWindow,
}

impl MedicineService {
    pub fn new(
        medicines: Arc<dyn MedicineRepository>,
        users: Arc<dyn UserRepository>,
        dispatcher: Arc<NotificationDispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            medicines,
            users,
            dispatcher,
            clock,
            window: ExpiryWindow::default(),
        }
    }
}

#[async_trait]
impl MedicinesCommand for MedicineService {
    async fn upload(&self, request: UploadMedicineRequest) -> Result<UploadedMedicine, Error> {
        let owner = self
            .users
            .find_by_email(&request.owner)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {} not found", request.owner)))?;
        let Some(phone) = owner.phone().cloned() else {
            return Err(Error::invalid_request(
                "a phone number is required before uploading medicines",
            ));
        };

        let now = self.clock.utc();
        let medicine = Medicine::new(MedicineDraft {
            id: MedicineId::random(),
            owner: request.owner,
            name: request.name,
            category: request.category,
            quantity: request.quantity,
            location: request.location,
            expires_at: request.expires_at,
            image_ref: request.image_ref,
            created_at: now,
        });
        self.medicines
            .insert(&medicine)
            .await
            .map_err(map_medicine_error)?;
        info!(medicine_id = %medicine.id(), owner = %medicine.owner(), "medicine uploaded");

        let alert = if self.window.alerts_on_upload(medicine.expires_at(), now) {
            match self
                .dispatcher
                .dispatch(&phone, &upload_alert_message(&medicine))
                .await
            {
                DispatchOutcome::Delivered => UploadAlert::Delivered,
                DispatchOutcome::Skipped => UploadAlert::Skipped,
                DispatchOutcome::Failed(err) => {
                    warn!(medicine_id = %medicine.id(), error = %err, "upload alert not delivered");
                    UploadAlert::Failed
                }
            }
        } else {
            UploadAlert::NotNeeded
        };

        Ok(UploadedMedicine { medicine, alert })
    }
}

#[async_trait]
impl MedicinesQuery for MedicineService {
    async fn list_for_owner(&self, owner: &Email) -> Result<Vec<Medicine>, Error> {
        self.medicines
            .list_for_owner(owner)
            .await
            .map_err(map_medicine_error)
    }

    async fn disposal_guide(&self, id: &MedicineId) -> Result<DisposalGuide, Error> {
        let medicine = self
            .medicines
            .find_by_id(id)
            .await
            .map_err(map_medicine_error)?
            .ok_or_else(|| Error::not_found(format!("medicine {id} not found")))?;
        Ok(DisposalGuide::for_medicine(&medicine))
    }
}
