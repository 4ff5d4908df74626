//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Date, Double, Int4, Nullable, Text};

use super::schema::{users, visits};

/// Credential columns of the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserCredentialsRow {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

/// Insertable visit. `visited_on` is left to the column default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = visits)]
pub(crate) struct NewVisitRow<'a> {
    pub user_id: i32,
    pub park_id: i32,
    pub rating: i16,
    pub note: &'a str,
}

/// A named geometry serialised to GeoJSON by the store.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct BoundaryRow {
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = Text)]
    pub geojson: String,
}

/// Park centroid with the total visit count across all users.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct AdminParkRow {
    #[diesel(sql_type = Int4)]
    pub id: i32,
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = Double)]
    pub lat: f64,
    #[diesel(sql_type = Double)]
    pub lon: f64,
    #[diesel(sql_type = BigInt)]
    pub visit_count: i64,
}

/// Park centroid with one user's visit date, if any.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct UserParkRow {
    #[diesel(sql_type = Int4)]
    pub id: i32,
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = Double)]
    pub lat: f64,
    #[diesel(sql_type = Double)]
    pub lon: f64,
    #[diesel(sql_type = Nullable<Date>)]
    pub visited_on: Option<NaiveDate>,
}

/// Visit total for one park.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct ParkStatRow {
    #[diesel(sql_type = Text)]
    pub park_name: String,
    #[diesel(sql_type = BigInt)]
    pub visit_count: i64,
}
