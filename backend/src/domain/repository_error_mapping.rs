//! Translate driven-port failures into domain errors for driving ports.

use crate::domain::Error;
use crate::domain::ports::{
    CommunityRepositoryError, MedicineRepositoryError, UserRepositoryError,
};

pub(crate) fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user store error: {message}"))
        }
        UserRepositoryError::DuplicateEmail { email } => {
            Error::conflict(format!("a user with email {email} already exists"))
        }
    }
}

pub(crate) fn map_medicine_error(error: MedicineRepositoryError) -> Error {
    match error {
        MedicineRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("medicine store unavailable: {message}"))
        }
        MedicineRepositoryError::Query { message } => {
            Error::internal(format!("medicine store error: {message}"))
        }
    }
}

pub(crate) fn map_community_error(error: CommunityRepositoryError) -> Error {
    match error {
        CommunityRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("community store unavailable: {message}"))
        }
        CommunityRepositoryError::Query { message } => {
            Error::internal(format!("community store error: {message}"))
        }
        CommunityRepositoryError::AlreadyShared { .. } => {
            Error::conflict("medicine already shared to the community")
        }
    }
}
