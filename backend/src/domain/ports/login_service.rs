//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call this port to authenticate credentials without
//! importing the backing infrastructure, so HTTP handler tests can substitute
//! a deterministic double instead of wiring persistence.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Error, LoginCredentials, Role, UserId, Username};

/// Domain use-case port for authentication.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated identity.
    ///
    /// Unknown users and wrong passwords both yield
    /// [`Error::unauthorized`] with the same message.
    async fn authenticate(&self, credentials: &LoginCredentials)
    -> Result<AuthenticatedUser, Error>;
}

/// In-memory authenticator for tests and database-less development.
///
/// Knows two accounts: `root` / `adminpw` (admin, id 1) and `ana` / `pass1`
/// (user, id 2).
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

impl FixtureLoginService {
    const ACCOUNTS: [(i32, &'static str, &'static str, Role); 2] = [
        (1, "root", "adminpw", Role::Admin),
        (2, "ana", "pass1", Role::User),
    ];
}

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedUser, Error> {
        let Some((id, username, _, role)) = Self::ACCOUNTS
            .iter()
            .find(|(_, name, pass, _)| {
                *name == credentials.username() && *pass == credentials.password()
            })
            .copied()
        else {
            return Err(Error::unauthorized("invalid credentials"));
        };
        let id = UserId::new(id)
            .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))?;
        let username = Username::new(username)
            .map_err(|err| Error::internal(format!("invalid fixture username: {err}")))?;
        Ok(AuthenticatedUser::new(id, username, role))
    }
}
