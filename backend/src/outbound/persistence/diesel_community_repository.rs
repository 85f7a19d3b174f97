//! PostgreSQL-backed `CommunityRepository`.
//!
//! Browsing pushes the filter and ordering into SQL; ties fall back to store
//! order (share time, then id) like the in-memory filter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{CommunityRepository, CommunityRepositoryError};
use crate::domain::{CommunityEntry, CommunityFilter, CommunitySort, Email, MedicineId};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{CommunityEntryRow, NewCommunityEntryRow};
use super::pool::{DbPool, PoolError};
use super::schema::community_entries;

#[derive(Clone)]
pub struct DieselCommunityRepository {
    pool: DbPool,
}

impl DieselCommunityRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CommunityRepositoryError {
    map_basic_pool_error(error, CommunityRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CommunityRepositoryError {
    map_basic_diesel_error(
        error,
        CommunityRepositoryError::query,
        CommunityRepositoryError::connection,
    )
}

fn decode_valid(rows: Vec<CommunityEntryRow>) -> Vec<CommunityEntry> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            CommunityEntry::try_from(row)
                .inspect_err(|reason| warn!(%id, %reason, "stored community entry failed validation"))
                .ok()
        })
        .collect()
}

/// Escape LIKE wildcards so user input matches literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[async_trait]
impl CommunityRepository for DieselCommunityRepository {
    async fn insert(&self, entry: &CommunityEntry) -> Result<(), CommunityRepositoryError> {
        let row = NewCommunityEntryRow::try_from(entry).map_err(CommunityRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(community_entries::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    CommunityRepositoryError::already_shared(
                        entry.medicine_id().to_string(),
                        entry.contributor().to_string(),
                    )
                } else {
                    map_diesel_error(err)
                }
            })?;
        Ok(())
    }

    async fn exists(
        &self,
        medicine_id: &MedicineId,
        contributor: &Email,
    ) -> Result<bool, CommunityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(diesel::dsl::exists(
            community_entries::table
                .filter(community_entries::medicine_id.eq(*medicine_id.as_uuid()))
                .filter(community_entries::contributor_email.eq(contributor.as_ref())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn browse(
        &self,
        filter: &CommunityFilter,
    ) -> Result<Vec<CommunityEntry>, CommunityRepositoryError> {
        use community_entries::dsl as ce;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = ce::community_entries.into_boxed();
        if let Some(category) = filter.category() {
            query = query.filter(ce::category.eq(category.to_owned()));
        }
        if let Some(search) = filter.search() {
            query = query.filter(ce::name.ilike(format!("%{}%", escape_like(search))));
        }
        query = match filter.sort() {
            CommunitySort::Expiry => {
                query.order((ce::expires_at.asc(), ce::shared_at.asc(), ce::id.asc()))
            }
            CommunitySort::Name => query.order((ce::name.asc(), ce::shared_at.asc(), ce::id.asc())),
            CommunitySort::SharedDate => query.order((ce::shared_at.desc(), ce::id.asc())),
        };

        let rows: Vec<CommunityEntryRow> = query
            .select(CommunityEntryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(decode_valid(rows))
    }

    async fn list_all(&self) -> Result<Vec<CommunityEntry>, CommunityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CommunityEntryRow> = community_entries::table
            .order((community_entries::shared_at.asc(), community_entries::id.asc()))
            .select(CommunityEntryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(decode_valid(rows))
    }
}
