//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie carries the authenticated identity (id, username, role) so a
//! request never needs a store round-trip to know who is asking. Values that
//! fail validation are treated as an anonymous session.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{AuthenticatedUser, Error, Role, UserId, Username};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const USERNAME_KEY: &str = "username";
pub(crate) const ROLE_KEY: &str = "role";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated identity in the session cookie.
    ///
    /// The session id is renewed so a pre-login cookie cannot be replayed.
    pub fn persist_user(&self, user: &AuthenticatedUser) -> Result<(), Error> {
        self.0.renew();
        self.insert(USER_ID_KEY, user.id().get())?;
        self.insert(USERNAME_KEY, user.username().as_ref())?;
        self.insert(ROLE_KEY, user.role().as_str())
    }

    fn insert(&self, key: &str, value: impl serde::Serialize) -> Result<(), Error> {
        self.0
            .insert(key, value)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    fn get<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Error> {
        self.0
            .get::<T>(key)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// The session owner, if the cookie carries a complete and valid identity.
    pub fn current_user(&self) -> Result<Option<AuthenticatedUser>, Error> {
        let (Some(id), Some(username), Some(role)) = (
            self.get::<i32>(USER_ID_KEY)?,
            self.get::<String>(USERNAME_KEY)?,
            self.get::<String>(ROLE_KEY)?,
        ) else {
            return Ok(None);
        };

        let id = match UserId::new(id) {
            Ok(id) => id,
            Err(error) => {
                warn!(%error, "invalid user id in session cookie");
                return Ok(None);
            }
        };
        let username = match Username::new(&username) {
            Ok(username) => username,
            Err(error) => {
                warn!(%error, "invalid username in session cookie");
                return Ok(None);
            }
        };
        let role = match role.parse::<Role>() {
            Ok(role) => role,
            Err(error) => {
                warn!(%error, "invalid role in session cookie");
                return Ok(None);
            }
        };
        Ok(Some(AuthenticatedUser::new(id, username, role)))
    }

    /// Require an authenticated user or return `401 Unauthorized`.
    pub fn require_user(&self) -> Result<AuthenticatedUser, Error> {
        self.current_user()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop every session value and expire the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
