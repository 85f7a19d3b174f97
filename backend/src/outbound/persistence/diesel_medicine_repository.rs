//! PostgreSQL-backed `MedicineRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{
    MedicineRecord, MedicineRecordError, MedicineRepository, MedicineRepositoryError,
};
use crate::domain::{Email, Medicine, MedicineId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{MedicineRow, NewMedicineRow};
use super::pool::{DbPool, PoolError};
use super::schema::medicines;

#[derive(Clone)]
pub struct DieselMedicineRepository {
    pool: DbPool,
}

impl DieselMedicineRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MedicineRepositoryError {
    map_basic_pool_error(error, MedicineRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> MedicineRepositoryError {
    map_basic_diesel_error(
        error,
        MedicineRepositoryError::query,
        MedicineRepositoryError::connection,
    )
}

fn decode(row: MedicineRow) -> MedicineRecord {
    let record_id = row.id.to_string();
    Medicine::try_from(row).map_err(|reason| MedicineRecordError::new(record_id, reason))
}

/// Decode rows for caller-facing reads, skipping invalid ones.
fn decode_valid(rows: Vec<MedicineRow>) -> Vec<Medicine> {
    rows.into_iter()
        .filter_map(|row| match decode(row) {
            Ok(medicine) => Some(medicine),
            Err(err) => {
                warn!(record_id = %err.record_id, reason = %err.reason, "stored medicine failed validation");
                None
            }
        })
        .collect()
}

#[async_trait]
impl MedicineRepository for DieselMedicineRepository {
    async fn insert(&self, medicine: &Medicine) -> Result<(), MedicineRepositoryError> {
        let row = NewMedicineRow::try_from(medicine).map_err(MedicineRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(medicines::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &MedicineId) -> Result<Option<Medicine>, MedicineRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<MedicineRow> = medicines::table
            .filter(medicines::id.eq(*id.as_uuid()))
            .select(MedicineRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| {
            decode(row).map_err(|err| {
                MedicineRepositoryError::query(format!("stored medicine is invalid: {err}"))
            })
        })
        .transpose()
    }

    async fn list_for_owner(&self, owner: &Email) -> Result<Vec<Medicine>, MedicineRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<MedicineRow> = medicines::table
            .filter(medicines::owner_email.eq(owner.as_ref()))
            .order((medicines::expires_at.asc(), medicines::id.asc()))
            .select(MedicineRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(decode_valid(rows))
    }

    async fn scan_all(&self) -> Result<Vec<MedicineRecord>, MedicineRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<MedicineRow> = medicines::table
            .order(medicines::created_at.asc())
            .select(MedicineRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(decode).collect())
    }
}
