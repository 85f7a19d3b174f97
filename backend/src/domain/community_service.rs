//! Sharing medicines to, and browsing, the community pool.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    CommunityCommand, CommunityQuery, CommunityRepository, MedicineRepository,
    ShareMedicineRequest, UserRepository,
};
use crate::domain::repository_error_mapping::{
    map_community_error, map_medicine_error, map_user_error,
};
use crate::domain::{CommunityEntry, CommunityFilter, Error};

/// Implements the community driving ports.
#[derive(Clone)]
pub struct CommunityService {
    community: Arc<dyn CommunityRepository>,
    medicines: Arc<dyn MedicineRepository>,
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl CommunityService {
    pub fn new(
        community: Arc<dyn CommunityRepository>,
        medicines: Arc<dyn MedicineRepository>,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            community,
            medicines,
            users,
            clock,
        }
    }
}

#[async_trait]
impl CommunityCommand for CommunityService {
    async fn share(&self, request: ShareMedicineRequest) -> Result<CommunityEntry, Error> {
        let ShareMedicineRequest {
            contributor,
            medicine_id,
        } = request;
        let medicine = self
            .medicines
            .find_by_id(&medicine_id)
            .await
            .map_err(map_medicine_error)?
            .ok_or_else(|| Error::not_found(format!("medicine {medicine_id} not found")))?;
        let user = self
            .users
            .find_by_email(&contributor)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {contributor} not found")))?;

        if self
            .community
            .exists(&medicine_id, &contributor)
            .await
            .map_err(map_community_error)?
        {
            return Err(Error::conflict("medicine already shared to the community"));
        }

        let entry = CommunityEntry::snapshot(&medicine, &user, self.clock.utc());
        self.community
            .insert(&entry)
            .await
            .map_err(map_community_error)?;
        info!(%medicine_id, contributor = %contributor, "medicine shared to community");
        Ok(entry)
    }
}

#[async_trait]
impl CommunityQuery for CommunityService {
    async fn browse(&self, filter: &CommunityFilter) -> Result<Vec<CommunityEntry>, Error> {
        self.community
            .browse(filter)
            .await
            .map_err(map_community_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        CommunityRepositoryError, MockCommunityRepository, MockMedicineRepository,
        MockUserRepository,
    };
    use crate::domain::{
        Category, CommunitySort, DisplayName, Email, ErrorCode, Medicine, MedicineDraft,
        MedicineId, MedicineName, PasswordHash, PickupLocation, Quantity, User, UserDraft,
    };
    use crate::test_support::MutableClock;
    use chrono::{DateTime, TimeZone, Utc};
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 4, 10, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn stored_medicine(now: DateTime<Utc>) -> Medicine {
        Medicine::new(MedicineDraft {
            id: MedicineId::random(),
            owner: Email::new("owner@example.com").expect("email"),
            name: MedicineName::new("Metformin").expect("name"),
            category: Category::new("tablet").expect("category"),
            quantity: Quantity::new(30).expect("quantity"),
            location: PickupLocation::new("Malleshwaram").expect("location"),
            expires_at: now,
            image_ref: None,
            created_at: now,
        })
    }

    fn contributor() -> User {
        User::new(UserDraft {
            email: Email::new("giver@example.com").expect("email"),
            password_hash: PasswordHash::new("$argon2id$stub").expect("hash"),
            display_name: Some(DisplayName::new("Giver").expect("name")),
            phone: None,
            location: None,
        })
    }

    fn request(medicine_id: MedicineId) -> ShareMedicineRequest {
        ShareMedicineRequest {
            contributor: Email::new("giver@example.com").expect("email"),
            medicine_id,
        }
    }

    struct Stores {
        community: MockCommunityRepository,
        medicines: MockMedicineRepository,
        users: MockUserRepository,
    }

    fn stores(medicine: Option<Medicine>, user: Option<User>) -> Stores {
        let mut medicines = MockMedicineRepository::new();
        medicines
            .expect_find_by_id()
            .returning(move |_| Ok(medicine.clone()));
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(user.clone()));
        Stores {
            community: MockCommunityRepository::new(),
            medicines,
            users,
        }
    }

    fn service(stores: Stores, now: DateTime<Utc>) -> CommunityService {
        CommunityService::new(
            Arc::new(stores.community),
            Arc::new(stores.medicines),
            Arc::new(stores.users),
            Arc::new(MutableClock::new(now)),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn share_snapshots_the_medicine(now: DateTime<Utc>) {
        let medicine = stored_medicine(now);
        let id = medicine.id();
        let mut stores = stores(Some(medicine), Some(contributor()));
        stores.community.expect_exists().returning(|_, _| Ok(false));
        stores.community.expect_insert().times(1).returning(|_| Ok(()));

        let entry = service(stores, now).share(request(id)).await.expect("shared");

        assert_eq!(entry.medicine_id(), id);
        assert_eq!(entry.shared_by(), "Giver");
        assert_eq!(entry.contact_info(), crate::domain::CONTACT_UNAVAILABLE);
        assert_eq!(entry.shared_at(), now);
    }

    #[rstest]
    #[tokio::test]
    async fn second_share_is_a_conflict(now: DateTime<Utc>) {
        let medicine = stored_medicine(now);
        let id = medicine.id();
        let mut stores = stores(Some(medicine), Some(contributor()));
        stores.community.expect_exists().returning(|_, _| Ok(true));
        stores.community.expect_insert().never();

        let err = service(stores, now)
            .share(request(id))
            .await
            .expect_err("conflict");

        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn racing_share_rejected_by_the_store_is_a_conflict(now: DateTime<Utc>) {
        let medicine = stored_medicine(now);
        let id = medicine.id();
        let mut stores = stores(Some(medicine), Some(contributor()));
        stores.community.expect_exists().returning(|_, _| Ok(false));
        stores.community.expect_insert().returning(|entry| {
            Err(CommunityRepositoryError::already_shared(
                entry.medicine_id().to_string(),
                entry.contributor().to_string(),
            ))
        });

        let err = service(stores, now)
            .share(request(id))
            .await
            .expect_err("conflict");

        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[case::missing_medicine(false, true)]
    #[case::missing_user(true, false)]
    #[tokio::test]
    async fn missing_records_are_not_found(
        now: DateTime<Utc>,
        #[case] medicine_exists: bool,
        #[case] user_exists: bool,
    ) {
        let medicine = stored_medicine(now);
        let id = medicine.id();
        let mut stores = stores(
            medicine_exists.then_some(medicine),
            user_exists.then(contributor),
        );
        stores.community.expect_insert().never();

        let err = service(stores, now)
            .share(request(id))
            .await
            .expect_err("not found");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn browse_passes_the_filter_through(now: DateTime<Utc>) {
        let mut stores = stores(None, None);
        stores
            .community
            .expect_browse()
            .withf(|filter| filter.sort() == CommunitySort::Name && filter.category() == Some("syrup"))
            .times(1)
            .returning(|_| Ok(Vec::new()));
        let filter = CommunityFilter::new(Some("syrup".to_owned()), None, CommunitySort::Name);

        let entries = service(stores, now).browse(&filter).await.expect("browse");

        assert!(entries.is_empty());
    }
}
