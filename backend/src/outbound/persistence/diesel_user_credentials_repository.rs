//! PostgreSQL-backed credential lookup.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserCredentialsRepository, UserCredentialsRepositoryError};
use crate::domain::{Role, StoredCredentials, StoredPassword, UserId, Username};

use super::diesel_helpers::{map_pool_error_message, map_read_error};
use super::models::UserCredentialsRow;
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of [`UserCredentialsRepository`].
#[derive(Clone)]
pub struct DieselUserCredentialsRepository {
    pool: DbPool,
}

impl DieselUserCredentialsRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserCredentialsRepositoryError {
    UserCredentialsRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> UserCredentialsRepositoryError {
    map_read_error(
        error,
        "credentials lookup",
        UserCredentialsRepositoryError::query,
        UserCredentialsRepositoryError::connection,
    )
}

fn row_to_credentials(
    row: UserCredentialsRow,
) -> Result<StoredCredentials, UserCredentialsRepositoryError> {
    let invalid =
        |err: crate::domain::UserValidationError| UserCredentialsRepositoryError::query(format!(
            "invalid user row {}: {err}",
            row.id
        ));
    Ok(StoredCredentials {
        id: UserId::new(row.id).map_err(invalid)?,
        username: Username::new(&row.username).map_err(invalid)?,
        role: row.role.parse::<Role>().map_err(invalid)?,
        password: StoredPassword::new(row.password_hash),
    })
}

#[async_trait]
impl UserCredentialsRepository for DieselUserCredentialsRepository {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserCredentialsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserCredentialsRow> = users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserCredentialsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_credentials).transpose()
    }
}
