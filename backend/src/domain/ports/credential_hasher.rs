//! Driven port for password hashing.

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised while hashing a credential.
    pub enum CredentialHashError {
        Hashing { message: String } => "credential hashing failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing PHC string.
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialHashError>;
}
