//! PostgreSQL persistence adapters using Diesel.
//!
//! Concrete implementations of the domain's driven ports, backed by
//! PostgreSQL with PostGIS through `diesel-async` and `bb8`.
//!
//! - **Thin adapters**: repositories only translate between rows and domain
//!   types. No business logic resides here.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Spatial SQL**: simplification, centroids and GeoJSON serialisation run
//!   in PostGIS via `sql_query`; plain tables use the typed DSL.
//!
//! # Example
//!
//! ```no_run
//! use parkmap::outbound::persistence::{DbPool, DieselParkRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/projekttbp")).await?;
//! let parks = DieselParkRepository::new(pool);
//! # let _ = parks;
//! # Ok(())
//! # }
//! ```

mod diesel_boundary_repository;
pub(crate) mod diesel_helpers;
mod diesel_park_repository;
mod diesel_user_credentials_repository;
mod diesel_visit_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_boundary_repository::DieselBoundaryRepository;
pub use diesel_park_repository::DieselParkRepository;
pub use diesel_user_credentials_repository::DieselUserCredentialsRepository;
pub use diesel_visit_repository::DieselVisitRepository;
pub use migrations::run_pending_migrations;
pub use pool::{DbPool, PoolConfig, PoolError};
