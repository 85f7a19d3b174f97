//! Community pool entries: denormalised snapshots of shared medicines.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Email, Medicine, MedicineId, MedicineName, PickupLocation, Quantity, User};

/// Contact shown when the contributor has no phone on file.
pub const CONTACT_UNAVAILABLE: &str = "Contact information not available";

/// Fields required to rebuild a stored [`CommunityEntry`].
#[derive(Debug, Clone)]
pub struct CommunityEntryDraft {
    pub id: Uuid,
    pub medicine_id: MedicineId,
    pub contributor: Email,
    pub name: MedicineName,
    pub category: Category,
    pub quantity: Quantity,
    pub location: PickupLocation,
    pub expires_at: DateTime<Utc>,
    pub image_ref: Option<String>,
    pub shared_by: String,
    pub contact_info: String,
    pub shared_at: DateTime<Utc>,
}

/// A medicine shared to the community pool.
///
/// The entry copies the medicine and contributor fields at share time and
/// does not follow later changes to either.
#[derive(Debug, Clone, PartialEq)]
pub struct CommunityEntry {
    id: Uuid,
    medicine_id: MedicineId,
    contributor: Email,
    name: MedicineName,
    category: Category,
    quantity: Quantity,
    location: PickupLocation,
    expires_at: DateTime<Utc>,
    image_ref: Option<String>,
    shared_by: String,
    contact_info: String,
    shared_at: DateTime<Utc>,
}

impl CommunityEntry {
    /// Snapshot `medicine` as shared by `contributor` at `shared_at`.
    pub fn snapshot(medicine: &Medicine, contributor: &User, shared_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            medicine_id: medicine.id(),
            contributor: contributor.email().clone(),
            name: medicine.name().clone(),
            category: medicine.category().clone(),
            quantity: medicine.quantity(),
            location: medicine.location().clone(),
            expires_at: medicine.expires_at(),
            image_ref: medicine.image_ref().map(str::to_owned),
            shared_by: contributor.public_name().to_owned(),
            contact_info: contributor
                .phone()
                .map_or_else(|| CONTACT_UNAVAILABLE.to_owned(), ToString::to_string),
            shared_at,
        }
    }

    pub fn from_draft(draft: CommunityEntryDraft) -> Self {
        let CommunityEntryDraft {
            id,
            medicine_id,
            contributor,
            name,
            category,
            quantity,
            location,
            expires_at,
            image_ref,
            shared_by,
            contact_info,
            shared_at,
        } = draft;
        Self {
            id,
            medicine_id,
            contributor,
            name,
            category,
            quantity,
            location,
            expires_at,
            image_ref,
            shared_by,
            contact_info,
            shared_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn medicine_id(&self) -> MedicineId {
        self.medicine_id
    }

    pub fn contributor(&self) -> &Email {
        &self.contributor
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

    pub fn shared_by(&self) -> &str {
        &self.shared_by
    }

    pub fn contact_info(&self) -> &str {
        &self.contact_info
    }

    pub fn shared_at(&self) -> DateTime<Utc> {
        self.shared_at
    }
}

/// Ordering applied when browsing the community pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommunitySort {
    /// Soonest expiry first.
    #[default]
    Expiry,
    /// Alphabetical by medicine name.
    Name,
    /// Most recently shared first.
    SharedDate,
}

impl CommunitySort {
    /// Parse a client sort key; unknown or missing keys fall back to expiry.
    pub fn from_key(key: Option<&str>) -> Self {
        match key.map(|raw| raw.trim().to_lowercase()).as_deref() {
            Some("name") => Self::Name,
            Some("date") => Self::SharedDate,
            _ => Self::Expiry,
        }
    }

    /// Compare two entries under this ordering.
    pub fn compare(self, a: &CommunityEntry, b: &CommunityEntry) -> Ordering {
        match self {
            Self::Expiry => a.expires_at.cmp(&b.expires_at),
            Self::Name => a.name.as_ref().cmp(b.name.as_ref()),
            Self::SharedDate => b.shared_at.cmp(&a.shared_at),
        }
    }
}

/// Browse filter for the community pool.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommunityFilter {
    category: Option<String>,
    search: Option<String>,
    sort: CommunitySort,
}

impl CommunityFilter {
    /// Build a filter; blank strings count as absent.
    ///
    /// # Examples
    /// ```
    /// use medcycle::domain::{CommunityFilter, CommunitySort};
    ///
    /// let filter = CommunityFilter::new(Some("tablet".into()), Some("  ".into()), CommunitySort::Name);
    /// assert_eq!(filter.category(), Some("tablet"));
    /// assert_eq!(filter.search(), None);
    /// ```
    pub fn new(category: Option<String>, search: Option<String>, sort: CommunitySort) -> Self {
        let non_blank = |value: Option<String>| {
            value
                .map(|raw| raw.trim().to_owned())
                .filter(|trimmed| !trimmed.is_empty())
        };
        Self {
            category: non_blank(category),
            search: non_blank(search),
            sort,
        }
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn sort(&self) -> CommunitySort {
        self.sort
    }

    /// Exact category match and case-insensitive name substring match.
    pub fn matches(&self, entry: &CommunityEntry) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|category| entry.category.as_ref() == category);
        let search_ok = self.search.as_deref().is_none_or(|needle| {
            entry
                .name
                .as_ref()
                .to_lowercase()
                .contains(&needle.to_lowercase())
        });
        category_ok && search_ok
    }

    /// Filter and order `entries` in memory.
    pub fn apply(&self, entries: impl IntoIterator<Item = CommunityEntry>) -> Vec<CommunityEntry> {
        let mut selected: Vec<_> = entries.into_iter().filter(|e| self.matches(e)).collect();
        selected.sort_by(|a, b| self.sort.compare(a, b));
        selected
    }
}
