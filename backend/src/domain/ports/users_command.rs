//! Driving port for user mutations.

use async_trait::async_trait;

use crate::domain::{Error, NewUser, UserId, UserPatch, UserView};

/// Write use-cases over users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Register a user and return the stored view without catalog details.
    async fn create_user(&self, user: NewUser) -> Result<UserView, Error>;

    /// Apply a partial update; `false` when the user does not exist.
    async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<bool, Error>;

    /// Delete a user; `false` when the user does not exist.
    async fn delete_user(&self, id: UserId) -> Result<bool, Error>;
}
