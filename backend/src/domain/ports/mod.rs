//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, messaging, hashing) are implemented by
//! outbound adapters; driving ports (commands and queries) are implemented by
//! domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod accounts_command;
mod community_command;
mod community_query;
mod community_repository;
mod credential_hasher;
mod leaderboard_query;
mod medicine_repository;
mod medicines_command;
mod medicines_query;
mod notification_sender;
mod sos_command;
mod user_repository;

#[cfg(test)]
pub use accounts_command::MockAccountsCommand;
pub use accounts_command::{AccountsCommand, RegisterUserRequest, RegisteredUser};
#[cfg(test)]
pub use community_command::MockCommunityCommand;
pub use community_command::{CommunityCommand, ShareMedicineRequest};
#[cfg(test)]
pub use community_query::MockCommunityQuery;
pub use community_query::CommunityQuery;
#[cfg(test)]
pub use community_repository::MockCommunityRepository;
pub use community_repository::{CommunityRepository, CommunityRepositoryError};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHashError, CredentialHasher};
#[cfg(test)]
pub use leaderboard_query::MockLeaderboardQuery;
pub use leaderboard_query::LeaderboardQuery;
#[cfg(test)]
pub use medicine_repository::MockMedicineRepository;
pub use medicine_repository::{
    MedicineRecord, MedicineRecordError, MedicineRepository, MedicineRepositoryError,
};
#[cfg(test)]
pub use medicines_command::MockMedicinesCommand;
pub use medicines_command::{
    MedicinesCommand, UploadAlert, UploadMedicineRequest, UploadedMedicine,
};
#[cfg(test)]
pub use medicines_query::MockMedicinesQuery;
pub use medicines_query::MedicinesQuery;
#[cfg(test)]
pub use notification_sender::MockNotificationSender;
pub use notification_sender::{NotificationSendError, NotificationSender, OutboundMessage};
#[cfg(test)]
pub use sos_command::MockSosCommand;
pub use sos_command::SosCommand;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
