//! Diesel table definitions for the plain (non-spatial) tables.
//!
//! These definitions must match `backend/migrations`. The `regions` and
//! `parks` tables carry PostGIS geometry columns Diesel has no type for; they
//! are only ever read through `sql_query` with the geometry functions applied
//! in SQL, so they are not declared here.

diesel::table! {
    /// Login accounts. Read-only from this service.
    users (id) {
        id -> Int4,
        /// Unique login name.
        username -> Varchar,
        /// Argon2 PHC string or legacy plaintext value.
        password_hash -> Text,
        /// `admin` or `user`.
        role -> Varchar,
    }
}

diesel::table! {
    /// Visit ledger. `(user_id, park_id)` is unique.
    visits (id) {
        id -> Int4,
        user_id -> Int4,
        park_id -> Int4,
        rating -> Int2,
        note -> Text,
        /// Defaults to the store's current date.
        visited_on -> Date,
    }
}
