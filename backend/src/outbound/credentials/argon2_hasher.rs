//! Argon2id implementation of the `CredentialHasher` port.

use argon2::Argon2;
use argon2::password_hash::{PasswordHasher, SaltString, rand_core::OsRng};

use crate::domain::PasswordHash;
use crate::domain::ports::{CredentialHashError, CredentialHasher};

/// Hashes passwords with the default Argon2id parameters and a random salt.
#[derive(Default, Clone)]
pub struct Argon2CredentialHasher {
    argon2: Argon2<'static>,
}

impl Argon2CredentialHasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| CredentialHashError::hashing(err.to_string()))?;
        PasswordHash::new(phc.to_string())
            .map_err(|err| CredentialHashError::hashing(err.to_string()))
    }
}
