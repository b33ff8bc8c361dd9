//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. The
//! `diesel print-schema` command can regenerate them from a live database.

diesel::table! {
    /// Registered users and the Pokemon they follow.
    users (id) {
        /// Serial primary key.
        id -> Int4,
        /// Display name (max 100 characters).
        name -> Varchar,
        /// Unique email address (max 200 characters).
        email -> Varchar,
        /// Stored credential (max 200 characters).
        password -> Varchar,
        /// Associated catalog identifiers; legacy rows may hold NULL.
        pokemon_ids -> Nullable<Array<Int4>>,
    }
}
