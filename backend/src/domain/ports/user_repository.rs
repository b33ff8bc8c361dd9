//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{EmailAddress, NewUser, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Conflict { message: String } => "user repository conflict: {message}",
    }
}

/// Driven port for user storage.
///
/// Adapters normalise a missing Pokemon ID array to an empty list, so the
/// domain never sees an "absent" association set.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Return every stored user.
    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Persist a new user and return it with its assigned identifier.
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Overwrite the stored record; returns `false` when no row matched.
    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError>;

    /// Remove a user; returns `false` when no row matched.
    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError>;

    /// Whether any stored user already owns `email`.
    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserPersistenceError>;
}
