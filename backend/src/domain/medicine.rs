//! Medicine records uploaded by users.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::Email;

/// Maximum allowed length for a medicine name.
pub const MEDICINE_NAME_MAX: usize = 120;
/// Maximum allowed length for a category label.
pub const CATEGORY_MAX: usize = 64;
/// Maximum allowed length for a pickup location.
pub const PICKUP_LOCATION_MAX: usize = 200;

/// Validation errors for medicine fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MedicineValidationError {
    #[error("medicine id must be a valid UUID")]
    InvalidId,
    #[error("{field} must not be empty")]
    Blank { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("quantity must be greater than zero")]
    NonPositiveQuantity,
    #[error("quantity {0} is too large")]
    QuantityTooLarge(i64),
}

fn bounded_text(
    raw: &str,
    field: &'static str,
    max: usize,
) -> Result<String, MedicineValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MedicineValidationError::Blank { field });
    }
    if trimmed.chars().count() > max {
        return Err(MedicineValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

/// Stable medicine identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MedicineId(Uuid);

impl MedicineId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse an identifier supplied by a client.
    pub fn parse(raw: &str) -> Result<Self, MedicineValidationError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| MedicineValidationError::InvalidId)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MedicineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! text_value {
    ($(#[$meta:meta])* $name:ident, $field:literal, $max:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(String);

        impl $name {
            /// Validate a trimmed, non-blank value.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, MedicineValidationError> {
                bounded_text(raw.as_ref(), $field, $max).map(Self)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

text_value!(
    /// Name of the medicine as entered by the owner.
    MedicineName,
    "name",
    MEDICINE_NAME_MAX
);
text_value!(
    /// Free-text category such as `tablet` or `syrup`.
    Category,
    "category",
    CATEGORY_MAX
);
text_value!(
    /// Where the medicine can be collected.
    PickupLocation,
    "location",
    PICKUP_LOCATION_MAX
);

/// Largest storable unit count.
pub const QUANTITY_MAX: u32 = i32::MAX.unsigned_abs();

/// Positive unit count, at most [`QUANTITY_MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(raw: i64) -> Result<Self, MedicineValidationError> {
        if raw <= 0 {
            return Err(MedicineValidationError::NonPositiveQuantity);
        }
        u32::try_from(raw)
            .ok()
            .filter(|count| *count <= QUANTITY_MAX)
            .map(Self)
            .ok_or(MedicineValidationError::QuantityTooLarge(raw))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

/// Fields required to build a [`Medicine`].
#[derive(Debug, Clone)]
pub struct MedicineDraft {
    pub id: MedicineId,
    pub owner: Email,
    pub name: MedicineName,
    pub category: Category,
    pub quantity: Quantity,
    pub location: PickupLocation,
    pub expires_at: DateTime<Utc>,
    pub image_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A medicine uploaded by its owner.
#[derive(Debug, Clone, PartialEq)]
pub struct Medicine {
    id: MedicineId,
    owner: Email,
    name: MedicineName,
    category: Category,
    quantity: Quantity,
    location: PickupLocation,
    expires_at: DateTime<Utc>,
    image_ref: Option<String>,
    created_at: DateTime<Utc>,
}

impl Medicine {
    pub fn new(draft: MedicineDraft) -> Self {
        let MedicineDraft {
            id,
            owner,
            name,
            category,
            quantity,
            location,
            expires_at,
            image_ref,
            created_at,
        } = draft;
        Self {
            id,
            owner,
            name,
            category,
            quantity,
            location,
            expires_at,
            image_ref: image_ref.filter(|value| !value.trim().is_empty()),
            created_at,
        }
    }

    pub fn id(&self) -> MedicineId {
        self.id
    }

    /// Email of the uploading user. A back-reference, not a foreign key.
    pub fn owner(&self) -> &Email {
        &self.owner
    }

    pub fn name(&self) -> &MedicineName {
        &self.name
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn location(&self) -> &PickupLocation {
        &self.location
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn image_ref(&self) -> Option<&str> {
        self.image_ref.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
