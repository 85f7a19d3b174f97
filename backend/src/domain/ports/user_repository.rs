//! Driven port for user persistence.

use async_trait::async_trait;

use crate::domain::{Email, User};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A user with this email already exists.
        DuplicateEmail { email: String } => "user {email} already exists",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, failing with `DuplicateEmail` when the email is taken.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Fetch a user by email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch the users matching any of `emails`, in no particular order.
    async fn find_many_by_email(&self, emails: &[Email]) -> Result<Vec<User>, UserRepositoryError>;

    /// List every user with a stored location.
    async fn list_with_location(&self) -> Result<Vec<User>, UserRepositoryError>;
}
