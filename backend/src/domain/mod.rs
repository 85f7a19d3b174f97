//! Domain types, services and ports.
//!
//! Purpose: hold the medicine-sharing rules independently of HTTP, the
//! database and the messaging provider. Inbound adapters call the driving
//! ports in [`ports`]; outbound adapters implement the driven ones.
//!
//! Public surface:
//! - Value types: [`Email`], [`PhoneNumber`], [`GeoPoint`], [`MedicineId`], ...
//! - Aggregates: [`User`], [`Medicine`], [`CommunityEntry`].
//! - Services: [`AccountService`], [`MedicineService`], [`CommunityService`],
//!   [`SosService`], [`LeaderboardService`] and the background
//!   [`ExpiryScanner`].
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure payload.

pub mod account_service;
pub mod community;
pub mod community_service;
pub mod disposal;
pub mod error;
pub mod expiry;
pub mod expiry_scanner;
pub mod geo;
pub mod leaderboard;
pub mod medicine;
pub mod medicine_service;
pub mod notification;
pub mod ports;
mod repository_error_mapping;
pub mod sos;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::community::{
    CONTACT_UNAVAILABLE, CommunityEntry, CommunityEntryDraft, CommunityFilter, CommunitySort,
};
pub use self::community_service::CommunityService;
pub use self::disposal::{DisposalGuide, DisposalKind};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::expiry::{EXPIRY_WINDOW_DAYS, ExpiryWindow, start_of_day_utc};
pub use self::expiry_scanner::{
    DEFAULT_SCAN_INTERVAL, ExpiryScanner, ExpiryScannerConfig, ExpiryScannerHandle,
    ExpiryScannerPorts, ScanReport, ScanSkip, ScanSkipReason, ScanSleeper, TokioSleeper,
};
pub use self::geo::{
    EARTH_RADIUS_KM, GeoPoint, GeoPointValidationError, LocationParseError, haversine_km,
    parse_lat_lon,
};
pub use self::leaderboard::{
    LEADERBOARD_SIZE, LeaderboardEntry, LeaderboardService, SharedItem, rank_contributors,
};
pub use self::medicine::{
    Category, Medicine, MedicineDraft, MedicineId, MedicineName, MedicineValidationError,
    PickupLocation, QUANTITY_MAX, Quantity,
};
pub use self::medicine_service::MedicineService;
pub use self::notification::{
    DispatchFailure, DispatchOutcome, DispatchReport, NotificationDispatcher,
};
pub use self::sos::{SOS_RADIUS_KM, SosOutcome, SosRequest, SosService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DisplayName, Email, PasswordHash, PhoneNumber, User, UserDraft, UserValidationError,
};
