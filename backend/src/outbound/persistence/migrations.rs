//! Embedded schema migrations.
//!
//! Diesel's migration harness needs a synchronous connection, so the run is
//! moved onto the blocking thread pool.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use super::pool::PoolError;

/// Migrations from the backend/migrations directory.
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply every pending migration to `database_url`.
///
/// # Errors
///
/// Returns [`PoolError::Build`] when the connection cannot be established or a
/// migration fails.
pub async fn run_pending_migrations(database_url: &str) -> Result<(), PoolError> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&url)
            .map_err(|err| PoolError::build(format!("migration connection: {err}")))?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| PoolError::build(format!("migration: {err}")))?;
        info!(count = applied.len(), "applied pending migrations");
        Ok(())
    })
    .await
    .map_err(|err| PoolError::build(format!("migration task: {err}")))?
}
