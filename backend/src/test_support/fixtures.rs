//! Builders for domain values used across tests.
//!
//! Inputs are trusted literals; invalid ones panic.

use chrono::{DateTime, Utc};

use crate::domain::{
    Category, Email, GeoPoint, Medicine, MedicineDraft, MedicineId, MedicineName, PasswordHash,
    PhoneNumber, PickupLocation, Quantity, User, UserDraft,
};

pub fn email(raw: &str) -> Email {
    match Email::new(raw) {
        Ok(email) => email,
        Err(err) => panic!("fixture email {raw:?} is invalid: {err}"),
    }
}

/// A user with an optional phone and an optional `(latitude, longitude)`.
pub fn user(address: &str, phone: Option<&str>, lat_lon: Option<(f64, f64)>) -> User {
    User::new(UserDraft {
        email: email(address),
        password_hash: PasswordHash::new("$plain$secret").unwrap_or_else(|err| panic!("{err}")),
        display_name: None,
        phone: phone.map(|raw| PhoneNumber::new(raw).unwrap_or_else(|err| panic!("{err}"))),
        location: lat_lon.map(|(latitude, longitude)| {
            GeoPoint::new(longitude, latitude).unwrap_or_else(|err| panic!("{err}"))
        }),
    })
}

/// A medicine with quantity 1; `created_at` equals `expires_at`.
pub fn medicine(owner: &str, name: &str, category: &str, expires_at: DateTime<Utc>) -> Medicine {
    Medicine::new(MedicineDraft {
        id: MedicineId::random(),
        owner: email(owner),
        name: MedicineName::new(name).unwrap_or_else(|err| panic!("{err}")),
        category: Category::new(category).unwrap_or_else(|err| panic!("{err}")),
        quantity: Quantity::new(1).unwrap_or_else(|err| panic!("{err}")),
        location: PickupLocation::new("Indiranagar pharmacy").unwrap_or_else(|err| panic!("{err}")),
        expires_at,
        image_ref: None,
        created_at: expires_at,
    })
}
