//! Account registration service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    AccountsCommand, CredentialHasher, RegisterUserRequest, RegisteredUser, UserRepository,
};
use crate::domain::repository_error_mapping::map_user_error;
use crate::domain::{Error, User, UserDraft};

/// Registers users, hashing their password before storage.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl AccountsCommand for AccountService {
    async fn register(&self, request: RegisterUserRequest) -> Result<RegisteredUser, Error> {
        if request.password.is_empty() {
            return Err(Error::invalid_request("password must not be empty"));
        }
        let password_hash = self
            .hasher
            .hash(&request.password)
            .map_err(|err| Error::internal(err.to_string()))?;

        let user = User::new(UserDraft {
            email: request.email,
            password_hash,
            display_name: request.display_name,
            phone: Some(request.phone),
            location: request.location,
        });
        self.users.insert(&user).await.map_err(map_user_error)?;

        info!(email = %user.email(), "user registered");
        Ok(RegisteredUser {
            email: user.email().clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        CredentialHashError, MockCredentialHasher, MockUserRepository, UserRepositoryError,
    };
    use crate::domain::{Email, ErrorCode, GeoPoint, PasswordHash, PhoneNumber};
    use rstest::{fixture, rstest};

    #[fixture]
    fn request() -> RegisterUserRequest {
        RegisterUserRequest {
            email: Email::new("asha@example.com").expect("email"),
            password: "correct horse".to_owned(),
            phone: PhoneNumber::new("+919800000001").expect("phone"),
            display_name: None,
            location: Some(GeoPoint::new(77.5946, 12.9716).expect("point")),
        }
    }

    fn hasher() -> MockCredentialHasher {
        let mut hasher = MockCredentialHasher::new();
        hasher.expect_hash().returning(|raw| {
            PasswordHash::new(format!("hashed:{raw}"))
                .map_err(|err| CredentialHashError::hashing(err.to_string()))
        });
        hasher
    }

    #[rstest]
    #[tokio::test]
    async fn stores_hashed_credentials(request: RegisterUserRequest) {
        let mut users = MockUserRepository::new();
        users
            .expect_insert()
            .withf(|user| {
                user.password_hash().as_ref() == "hashed:correct horse"
                    && user.phone().map(ToString::to_string) == Some("+919800000001".to_owned())
                    && user.location().is_some()
            })
            .times(1)
            .returning(|_| Ok(()));
        let service = AccountService::new(Arc::new(users), Arc::new(hasher()));

        let registered = service.register(request).await.expect("registered");

        assert_eq!(registered.email.as_ref(), "asha@example.com");
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_is_a_conflict(request: RegisterUserRequest) {
        let mut users = MockUserRepository::new();
        users
            .expect_insert()
            .returning(|user| Err(UserRepositoryError::duplicate_email(user.email().to_string())));
        let service = AccountService::new(Arc::new(users), Arc::new(hasher()));

        let err = service.register(request).await.expect_err("duplicate");

        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn empty_password_is_rejected_before_hashing(mut request: RegisterUserRequest) {
        request.password.clear();
        let mut hasher = MockCredentialHasher::new();
        hasher.expect_hash().never();
        let service = AccountService::new(Arc::new(MockUserRepository::new()), Arc::new(hasher));

        let err = service.register(request).await.expect_err("empty password");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn hashing_failure_is_internal(request: RegisterUserRequest) {
        let mut hasher = MockCredentialHasher::new();
        hasher
            .expect_hash()
            .returning(|_| Err(CredentialHashError::hashing("out of memory")));
        let mut users = MockUserRepository::new();
        users.expect_insert().never();
        let service = AccountService::new(Arc::new(users), Arc::new(hasher));

        let err = service.register(request).await.expect_err("hash failure");

        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
