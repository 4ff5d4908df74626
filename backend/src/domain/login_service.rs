//! Credential-backed login service.
//!
//! Implements the [`LoginService`] driving port on top of the
//! [`UserCredentialsRepository`] driven port. Unknown users and wrong
//! passwords are indistinguishable to callers.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{LoginService, UserCredentialsRepository, UserCredentialsRepositoryError};
use crate::domain::park_map_service::STORE_UNAVAILABLE;
use crate::domain::{AuthenticatedUser, Error, LoginCredentials, PasswordCheck, Username};

const INVALID_CREDENTIALS: &str = "invalid credentials";

fn map_repository_error(error: UserCredentialsRepositoryError) -> Error {
    match error {
        UserCredentialsRepositoryError::Connection { message } => {
            warn!(error = %message, "credentials repository unavailable");
            Error::service_unavailable(STORE_UNAVAILABLE)
        }
        UserCredentialsRepositoryError::Query { message } => {
            Error::internal(format!("credentials repository error: {message}"))
        }
    }
}

/// Login service checking submitted passwords against stored credentials.
#[derive(Clone)]
pub struct CredentialsLoginService<R> {
    credentials_repo: Arc<R>,
}

impl<R> CredentialsLoginService<R> {
    /// Create a new service over the credentials repository.
    pub fn new(credentials_repo: Arc<R>) -> Self {
        Self { credentials_repo }
    }
}

#[async_trait]
impl<R> LoginService for CredentialsLoginService<R>
where
    R: UserCredentialsRepository,
{
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedUser, Error> {
        // A name the store could never hold cannot match a row.
        let Ok(username) = Username::new(credentials.username()) else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let Some(stored) = self
            .credentials_repo
            .find_by_username(&username)
            .await
            .map_err(map_repository_error)?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let check = stored.password.verify(credentials.password());
        if !check.is_match() {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        if check == PasswordCheck::VerifiedLegacy {
            warn!(user_id = %stored.id, "user authenticated with a legacy plaintext credential");
        }
        info!(user_id = %stored.id, role = %stored.role, "user logged in");
        Ok(AuthenticatedUser::new(stored.id, stored.username, stored.role))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::MockUserCredentialsRepository;
    use crate::domain::{ErrorCode, Role, StoredCredentials, StoredPassword, UserId};
    use rstest::rstest;

    fn stored(password: StoredPassword) -> StoredCredentials {
        StoredCredentials {
            id: UserId::new(2).expect("valid id"),
            username: Username::new("ana").expect("valid username"),
            password,
            role: Role::User,
        }
    }

    fn service_returning(
        row: Option<StoredCredentials>,
    ) -> CredentialsLoginService<MockUserCredentialsRepository> {
        let mut repo = MockUserCredentialsRepository::new();
        repo.expect_find_by_username()
            .times(1)
            .return_once(move |_| Ok(row));
        CredentialsLoginService::new(Arc::new(repo))
    }

    fn creds(username: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(username, password).expect("credentials shape")
    }

    #[rstest]
    #[case(StoredPassword::new("pass1"))]
    #[case(StoredPassword::hashed(b"salt-ana", "pass1").expect("hash"))]
    #[tokio::test]
    async fn matching_password_returns_identity_and_role(#[case] password: StoredPassword) {
        let service = service_returning(Some(stored(password)));
        let user = service
            .authenticate(&creds("ana", "pass1"))
            .await
            .expect("login succeeds");
        assert_eq!(user.id().get(), 2);
        assert_eq!(user.role(), Role::User);
        assert_eq!(user.username().as_ref(), "ana");
    }

    #[rstest]
    #[case(Some(stored(StoredPassword::new("pass1"))), "wrong")]
    #[case(None, "pass1")]
    #[tokio::test]
    async fn mismatches_and_unknown_users_look_identical(
        #[case] row: Option<StoredCredentials>,
        #[case] password: &str,
    ) {
        let service = service_returning(row);
        let err = service
            .authenticate(&creds("ana", password))
            .await
            .expect_err("login fails");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "invalid credentials");
    }

    #[rstest]
    #[case(
        UserCredentialsRepositoryError::connection("timed out waiting for connection from 10.0.0.5"),
        ErrorCode::ServiceUnavailable
    )]
    #[case(UserCredentialsRepositoryError::query("bad row"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn repository_failures_are_mapped(
        #[case] failure: UserCredentialsRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut repo = MockUserCredentialsRepository::new();
        repo.expect_find_by_username()
            .times(1)
            .return_once(move |_| Err(failure));
        let service = CredentialsLoginService::new(Arc::new(repo));
        let err = service
            .authenticate(&creds("ana", "pass1"))
            .await
            .expect_err("login fails");
        assert_eq!(err.code(), expected);
        if expected == ErrorCode::ServiceUnavailable {
            assert_eq!(err.message(), "park store unavailable");
        }
    }

    #[rstest]
    #[case(" ana")]
    #[case("ana  ")]
    #[case("Ana")]
    #[tokio::test]
    async fn usernames_are_looked_up_as_submitted(#[case] submitted: &'static str) {
        let mut repo = MockUserCredentialsRepository::new();
        repo.expect_find_by_username()
            .withf(move |username| username.as_ref() == submitted)
            .times(1)
            .returning(|username| {
                Ok((username.as_ref() == "ana")
                    .then(|| stored(StoredPassword::new("pass1"))))
            });
        let service = CredentialsLoginService::new(Arc::new(repo));
        let err = service
            .authenticate(&creds(submitted, "pass1"))
            .await
            .expect_err("login fails");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn overlong_usernames_never_reach_the_store() {
        let mut repo = MockUserCredentialsRepository::new();
        repo.expect_find_by_username().times(0);
        let service = CredentialsLoginService::new(Arc::new(repo));
        let err = service
            .authenticate(&creds(&"a".repeat(200), "pass1"))
            .await
            .expect_err("login fails");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
