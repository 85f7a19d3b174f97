//! Driving port for account registration.

use async_trait::async_trait;

use crate::domain::{DisplayName, Email, Error, GeoPoint, PhoneNumber};

/// Validated registration input.
#[derive(Clone)]
pub struct RegisterUserRequest {
    pub email: Email,
    pub password: String,
    pub phone: PhoneNumber,
    pub display_name: Option<DisplayName>,
    pub location: Option<GeoPoint>,
}

impl std::fmt::Debug for RegisterUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterUserRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("phone", &self.phone)
            .field("display_name", &self.display_name)
            .field("location", &self.location)
            .finish()
    }
}

/// Outcome of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredUser {
    pub email: Email,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsCommand: Send + Sync {
    /// Register a new user; a taken email is a conflict.
    async fn register(&self, request: RegisterUserRequest) -> Result<RegisteredUser, Error>;
}
