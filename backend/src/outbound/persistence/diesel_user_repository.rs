//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Stored text columns are trusted as written; only the identifier is checked
//! on the way out. A row that still fails conversion is skipped by `list_all`
//! with a warning so one bad record cannot hide the rest of the table.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    DisplayName, EmailAddress, NewUser, Password, PokemonId, User, UserId,
};

use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain user persistence errors.
fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors to domain user persistence errors.
fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            UserPersistenceError::conflict(
                info.constraint_name()
                    .map_or_else(|| "unique constraint violated".to_owned(), str::to_owned),
            )
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => UserPersistenceError::query("database error"),
        _ => UserPersistenceError::query("database error"),
    }
}

fn pokemon_ids_from_row(user_id: i32, raw: Option<Vec<i32>>) -> Vec<PokemonId> {
    raw.unwrap_or_default()
        .into_iter()
        .filter_map(|value| match PokemonId::new(value) {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(user_id, %error, "skipping invalid stored pokemon id");
                None
            }
        })
        .collect()
}

/// Convert a database row to a domain user.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let UserRow {
        id,
        name,
        email,
        password,
        pokemon_ids,
    } = row;
    let user_id = UserId::new(id).map_err(|error| {
        UserPersistenceError::query(format!("stored user {id} is invalid: {error}"))
    })?;
    let fields = NewUser {
        name: DisplayName::from_stored(name),
        email: EmailAddress::from_stored(email),
        password: Password::from_stored(password),
        pokemon_ids: pokemon_ids_from_row(id, pokemon_ids),
    };
    Ok(User::new(user_id, fields))
}

fn rows_to_users(rows: Vec<UserRow>) -> Vec<User> {
    rows.into_iter()
        .filter_map(|row| match row_to_user(row) {
            Ok(user) => Some(user),
            Err(error) => {
                warn!(%error, "skipping unreadable stored user");
                None
            }
        })
        .collect()
}

fn raw_pokemon_ids(ids: &[PokemonId]) -> Vec<i32> {
    ids.iter().map(|id| id.get()).collect()
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows_to_users(rows))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            name: user.name.as_ref(),
            email: user.email.as_ref(),
            password: user.password.expose(),
            pokemon_ids: raw_pokemon_ids(&user.pokemon_ids),
        };

        let row: UserRow = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_user(row)
    }

    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = UserUpdate {
            name: user.name().as_ref(),
            email: user.email().as_ref(),
            password: user.password().expose(),
            pokemon_ids: raw_pokemon_ids(user.pokemon_ids()),
        };

        let updated = diesel::update(users::table.find(user.id().get()))
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(updated > 0)
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(users::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(diesel::dsl::exists(
            users::table.filter(users::email.eq(email.as_ref())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }
}
