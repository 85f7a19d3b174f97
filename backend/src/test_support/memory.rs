//! In-memory repository doubles.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{
    CommunityRepository, CommunityRepositoryError, MedicineRecord, MedicineRecordError,
    MedicineRepository, MedicineRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{CommunityEntry, CommunityFilter, Email, Medicine, MedicineId, User};

use super::lock;

/// Users keyed by email, with optional per-email lookup failures.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    failing: Mutex<HashSet<Email>>,
}

impl InMemoryUserRepository {
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: Mutex::new(users.into_iter().collect()),
            failing: Mutex::default(),
        }
    }

    /// Make lookups of `email` fail with a connection error.
    pub fn fail_lookups_for(&self, email: &Email) {
        lock(&self.failing, "failing").insert(email.clone());
    }

    pub fn users(&self) -> Vec<User> {
        lock(&self.users, "users").clone()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut users = lock(&self.users, "users");
        if users.iter().any(|existing| existing.email() == user.email()) {
            return Err(UserRepositoryError::duplicate_email(user.email().to_string()));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError> {
        if lock(&self.failing, "failing").contains(email) {
            return Err(UserRepositoryError::connection("simulated lookup failure"));
        }
        Ok(lock(&self.users, "users")
            .iter()
            .find(|user| user.email() == email)
            .cloned())
    }

    async fn find_many_by_email(&self, emails: &[Email]) -> Result<Vec<User>, UserRepositoryError> {
        Ok(lock(&self.users, "users")
            .iter()
            .filter(|user| emails.contains(user.email()))
            .cloned()
            .collect())
    }

    async fn list_with_location(&self) -> Result<Vec<User>, UserRepositoryError> {
        Ok(lock(&self.users, "users")
            .iter()
            .filter(|user| user.location().is_some())
            .cloned()
            .collect())
    }
}

/// Medicine records, including ones that fail to decode.
#[derive(Default)]
pub struct InMemoryMedicineRepository {
    records: Mutex<Vec<MedicineRecord>>,
}

impl InMemoryMedicineRepository {
    pub fn with_medicines(medicines: impl IntoIterator<Item = Medicine>) -> Self {
        Self {
            records: Mutex::new(medicines.into_iter().map(Ok).collect()),
        }
    }

    /// Store a record that the scanner will see as undecodable.
    pub fn push_undecodable(&self, record_id: &str, reason: &str) {
        lock(&self.records, "records").push(Err(MedicineRecordError::new(record_id, reason)));
    }

    fn medicines(&self) -> Vec<Medicine> {
        lock(&self.records, "records")
            .iter()
            .filter_map(|record| record.as_ref().ok().cloned())
            .collect()
    }
}

#[async_trait]
impl MedicineRepository for InMemoryMedicineRepository {
    async fn insert(&self, medicine: &Medicine) -> Result<(), MedicineRepositoryError> {
        lock(&self.records, "records").push(Ok(medicine.clone()));
        Ok(())
    }

    async fn find_by_id(&self, id: &MedicineId) -> Result<Option<Medicine>, MedicineRepositoryError> {
        Ok(self.medicines().into_iter().find(|medicine| medicine.id() == *id))
    }

    async fn list_for_owner(&self, owner: &Email) -> Result<Vec<Medicine>, MedicineRepositoryError> {
        let mut owned: Vec<_> = self
            .medicines()
            .into_iter()
            .filter(|medicine| medicine.owner() == owner)
            .collect();
        owned.sort_by_key(Medicine::expires_at);
        Ok(owned)
    }

    async fn scan_all(&self) -> Result<Vec<MedicineRecord>, MedicineRepositoryError> {
        Ok(lock(&self.records, "records").clone())
    }
}

/// Community entries with the (medicine, contributor) uniqueness rule.
#[derive(Default)]
pub struct InMemoryCommunityRepository {
    entries: Mutex<Vec<CommunityEntry>>,
}

impl InMemoryCommunityRepository {
    pub fn with_entries(entries: impl IntoIterator<Item = CommunityEntry>) -> Self {
        Self {
            entries: Mutex::new(entries.into_iter().collect()),
        }
    }

    pub fn entries(&self) -> Vec<CommunityEntry> {
        lock(&self.entries, "entries").clone()
    }
}

#[async_trait]
impl CommunityRepository for InMemoryCommunityRepository {
    async fn insert(&self, entry: &CommunityEntry) -> Result<(), CommunityRepositoryError> {
        let mut entries = lock(&self.entries, "entries");
        let taken = entries.iter().any(|existing| {
            existing.medicine_id() == entry.medicine_id()
                && existing.contributor() == entry.contributor()
        });
        if taken {
            return Err(CommunityRepositoryError::already_shared(
                entry.medicine_id().to_string(),
                entry.contributor().to_string(),
            ));
        }
        entries.push(entry.clone());
        Ok(())
    }

    async fn exists(
        &self,
        medicine_id: &MedicineId,
        contributor: &Email,
    ) -> Result<bool, CommunityRepositoryError> {
        Ok(lock(&self.entries, "entries").iter().any(|existing| {
            existing.medicine_id() == *medicine_id && existing.contributor() == contributor
        }))
    }

    async fn browse(
        &self,
        filter: &CommunityFilter,
    ) -> Result<Vec<CommunityEntry>, CommunityRepositoryError> {
        Ok(filter.apply(self.list_all().await?))
    }

    async fn list_all(&self) -> Result<Vec<CommunityEntry>, CommunityRepositoryError> {
        let mut entries = self.entries();
        entries.sort_by_key(|entry| (entry.shared_at(), entry.id()));
        Ok(entries)
    }
}
