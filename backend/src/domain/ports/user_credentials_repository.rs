//! Port abstraction for reading stored login credentials.
use async_trait::async_trait;

use crate::domain::{StoredCredentials, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised when reading stored credentials.
    pub enum UserCredentialsRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "credentials repository connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } =>
            "credentials repository query failed: {message}",
    }
}

/// Port for looking up the credential row of a user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCredentialsRepository: Send + Sync {
    /// Fetch the credential row for `username`, if the user exists.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserCredentialsRepositoryError>;
}

/// Fixture implementation that knows no users.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserCredentialsRepository;

#[async_trait]
impl UserCredentialsRepository for FixtureUserCredentialsRepository {
    async fn find_by_username(
        &self,
        _username: &Username,
    ) -> Result<Option<StoredCredentials>, UserCredentialsRepositoryError> {
        Ok(None)
    }
}
