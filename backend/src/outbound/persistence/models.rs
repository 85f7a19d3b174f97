//! Internal Diesel row structs and their conversions to domain types.
//!
//! Rows never leave the persistence adapters. Reading a row re-validates it
//! through the domain constructors, so a hand-edited or legacy row surfaces
//! as a decode error instead of an invalid aggregate.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Category, CommunityEntry, CommunityEntryDraft, DisplayName, Email, GeoPoint, Medicine,
    MedicineDraft, MedicineId, MedicineName, PasswordHash, PhoneNumber, PickupLocation, Quantity,
    User, UserDraft,
};

use super::schema::{community_entries, medicines, users};

/// Reason a stored row failed domain validation.
pub(crate) type DecodeError = String;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub display_name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

impl<'a> From<&'a User> for NewUserRow<'a> {
    fn from(user: &'a User) -> Self {
        let location = user.location();
        Self {
            email: user.email().as_ref(),
            password_hash: user.password_hash().as_ref(),
            display_name: user.display_name().map(AsRef::as_ref),
            phone: user.phone().map(AsRef::as_ref),
            longitude: location.map(|point| point.longitude()),
            latitude: location.map(|point| point.latitude()),
        }
    }
}

impl TryFrom<UserRow> for User {
    type Error = DecodeError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let location = match (row.longitude, row.latitude) {
            (Some(longitude), Some(latitude)) => {
                Some(GeoPoint::new(longitude, latitude).map_err(|err| err.to_string())?)
            }
            _ => None,
        };
        Ok(User::new(UserDraft {
            email: Email::new(&row.email).map_err(|err| err.to_string())?,
            password_hash: PasswordHash::new(row.password_hash).map_err(|err| err.to_string())?,
            display_name: row
                .display_name
                .map(DisplayName::new)
                .transpose()
                .map_err(|err| err.to_string())?,
            phone: row
                .phone
                .map(PhoneNumber::new)
                .transpose()
                .map_err(|err| err.to_string())?,
            location,
        }))
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = medicines)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MedicineRow {
    pub id: Uuid,
    pub owner_email: String,
    pub name: String,
    pub category: String,
    pub quantity: i32,
    pub location: String,
    pub expires_at: DateTime<Utc>,
    pub image_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = medicines)]
pub(crate) struct NewMedicineRow<'a> {
    pub id: Uuid,
    pub owner_email: &'a str,
    pub name: &'a str,
    pub category: &'a str,
    pub quantity: i32,
    pub location: &'a str,
    pub expires_at: DateTime<Utc>,
    pub image_ref: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

impl<'a> TryFrom<&'a Medicine> for NewMedicineRow<'a> {
    type Error = DecodeError;

    fn try_from(medicine: &'a Medicine) -> Result<Self, Self::Error> {
        Ok(Self {
            id: *medicine.id().as_uuid(),
            owner_email: medicine.owner().as_ref(),
            name: medicine.name().as_ref(),
            category: medicine.category().as_ref(),
            quantity: quantity_column(medicine.quantity())?,
            location: medicine.location().as_ref(),
            expires_at: medicine.expires_at(),
            image_ref: medicine.image_ref(),
            created_at: medicine.created_at(),
        })
    }
}

impl TryFrom<MedicineRow> for Medicine {
    type Error = DecodeError;

    fn try_from(row: MedicineRow) -> Result<Self, Self::Error> {
        Ok(Medicine::new(MedicineDraft {
            id: MedicineId::from_uuid(row.id),
            owner: Email::new(&row.owner_email).map_err(|err| err.to_string())?,
            name: MedicineName::new(&row.name).map_err(|err| err.to_string())?,
            category: Category::new(&row.category).map_err(|err| err.to_string())?,
            quantity: Quantity::new(i64::from(row.quantity)).map_err(|err| err.to_string())?,
            location: PickupLocation::new(&row.location).map_err(|err| err.to_string())?,
            expires_at: row.expires_at,
            image_ref: row.image_ref,
            created_at: row.created_at,
        }))
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = community_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommunityEntryRow {
    pub id: Uuid,
    pub medicine_id: Uuid,
    pub contributor_email: String,
    pub name: String,
    pub category: String,
    pub quantity: i32,
    pub location: String,
    pub expires_at: DateTime<Utc>,
    pub image_ref: Option<String>,
    pub shared_by: String,
    pub contact_info: String,
    pub shared_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = community_entries)]
pub(crate) struct NewCommunityEntryRow<'a> {
    pub id: Uuid,
    pub medicine_id: Uuid,
    pub contributor_email: &'a str,
    pub name: &'a str,
    pub category: &'a str,
    pub quantity: i32,
    pub location: &'a str,
    pub expires_at: DateTime<Utc>,
    pub image_ref: Option<&'a str>,
    pub shared_by: &'a str,
    pub contact_info: &'a str,
    pub shared_at: DateTime<Utc>,
}

impl<'a> TryFrom<&'a CommunityEntry> for NewCommunityEntryRow<'a> {
    type Error = DecodeError;

    fn try_from(entry: &'a CommunityEntry) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entry.id(),
            medicine_id: *entry.medicine_id().as_uuid(),
            contributor_email: entry.contributor().as_ref(),
            name: entry.name().as_ref(),
            category: entry.category().as_ref(),
            quantity: quantity_column(entry.quantity())?,
            location: entry.location().as_ref(),
            expires_at: entry.expires_at(),
            image_ref: entry.image_ref(),
            shared_by: entry.shared_by(),
            contact_info: entry.contact_info(),
            shared_at: entry.shared_at(),
        })
    }
}

impl TryFrom<CommunityEntryRow> for CommunityEntry {
    type Error = DecodeError;

    fn try_from(row: CommunityEntryRow) -> Result<Self, Self::Error> {
        Ok(CommunityEntry::from_draft(CommunityEntryDraft {
            id: row.id,
            medicine_id: MedicineId::from_uuid(row.medicine_id),
            contributor: Email::new(&row.contributor_email).map_err(|err| err.to_string())?,
            name: MedicineName::new(&row.name).map_err(|err| err.to_string())?,
            category: Category::new(&row.category).map_err(|err| err.to_string())?,
            quantity: Quantity::new(i64::from(row.quantity)).map_err(|err| err.to_string())?,
            location: PickupLocation::new(&row.location).map_err(|err| err.to_string())?,
            expires_at: row.expires_at,
            image_ref: row.image_ref,
            shared_by: row.shared_by,
            contact_info: row.contact_info,
            shared_at: row.shared_at,
        }))
    }
}

fn quantity_column(quantity: Quantity) -> Result<i32, DecodeError> {
    i32::try_from(quantity.get()).map_err(|_| format!("quantity {} exceeds column range", quantity.get()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QUANTITY_MAX;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn medicine_row() -> MedicineRow {
        let at = Utc
            .with_ymd_and_hms(2026, 9, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        MedicineRow {
            id: Uuid::new_v4(),
            owner_email: "Asha@Example.com".to_owned(),
            name: "Amoxicillin".to_owned(),
            category: "capsule".to_owned(),
            quantity: 10,
            location: "BTM Layout".to_owned(),
            expires_at: at,
            image_ref: None,
            created_at: at,
        }
    }

    #[rstest]
    fn medicine_rows_decode_through_domain_rules(medicine_row: MedicineRow) {
        let medicine = Medicine::try_from(medicine_row).expect("valid row");
        assert_eq!(medicine.owner().as_ref(), "asha@example.com");
        assert_eq!(medicine.quantity().get(), 10);
    }

    #[rstest]
    #[case::zero_quantity(0, "Amoxicillin")]
    #[case::blank_name(3, "   ")]
    fn invalid_medicine_rows_are_decode_errors(
        mut medicine_row: MedicineRow,
        #[case] quantity: i32,
        #[case] name: &str,
    ) {
        medicine_row.quantity = quantity;
        medicine_row.name = name.to_owned();
        assert!(Medicine::try_from(medicine_row).is_err());
    }

    #[rstest]
    fn largest_quantity_fits_the_column(mut medicine_row: MedicineRow) {
        medicine_row.quantity = i32::MAX;
        let medicine = Medicine::try_from(medicine_row).expect("valid row");
        assert_eq!(medicine.quantity().get(), QUANTITY_MAX);

        let row = NewMedicineRow::try_from(&medicine).expect("fits INTEGER");
        assert_eq!(row.quantity, i32::MAX);
    }

    #[rstest]
    fn user_rows_need_both_coordinates_for_a_location() {
        let row = UserRow {
            email: "asha@example.com".to_owned(),
            password_hash: "$argon2id$stub".to_owned(),
            display_name: None,
            phone: Some("+919800000001".to_owned()),
            longitude: Some(77.59),
            latitude: None,
        };
        let user = User::try_from(row).expect("valid row");
        assert!(user.location().is_none());
    }

    #[rstest]
    fn user_insert_rows_split_the_location() {
        let user = User::new(UserDraft {
            email: Email::new("asha@example.com").expect("email"),
            password_hash: PasswordHash::new("$argon2id$stub").expect("hash"),
            display_name: None,
            phone: None,
            location: Some(GeoPoint::new(77.59, 12.97).expect("point")),
        });
        let row = NewUserRow::from(&user);
        assert_eq!((row.longitude, row.latitude), (Some(77.59), Some(12.97)));
    }
}
