//! User domain service.
//!
//! Implements the `UsersQuery` and `UsersCommand` driving ports on top of the
//! `UserRepository` and `PokemonCatalog` driven ports. Read paths attach
//! catalog details through [`PokemonFanout`]; write paths never consult the
//! catalog.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::ports::{
    PokemonCatalog, UserPersistenceError, UserRepository, UsersCommand, UsersQuery,
};
use crate::domain::{
    EmailAddress, Error, NewUser, PokemonFanout, User, UserId, UserPatch, UserView,
};

/// User service implementing the driving ports.
pub struct UserService<R: ?Sized, C: ?Sized> {
    users: Arc<R>,
    fanout: PokemonFanout<C>,
}

impl<R: ?Sized, C: ?Sized> Clone for UserService<R, C> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            fanout: self.fanout.clone(),
        }
    }
}

impl<R, C> UserService<R, C>
where
    R: UserRepository + ?Sized,
    C: PokemonCatalog + ?Sized,
{
    /// Create a service bounding each catalog lookup by `lookup_timeout`.
    pub fn new(users: Arc<R>, catalog: Arc<C>, lookup_timeout: Duration) -> Self {
        Self {
            users,
            fanout: PokemonFanout::new(catalog, lookup_timeout),
        }
    }

    fn map_persistence_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserPersistenceError::Conflict { .. } => Self::duplicate_email(),
        }
    }

    fn duplicate_email() -> Error {
        Error::conflict("email already registered").with_details(json!({
            "field": "email",
            "code": "duplicate_email",
        }))
    }

    async fn enrich(&self, user: &User, cancel: &CancellationToken) -> UserView {
        let details = self
            .fanout
            .fetch_many(user.pokemon_ids().iter().copied(), cancel)
            .await;
        UserView::from(user).with_details(details)
    }

    async fn ensure_email_free(&self, email: &EmailAddress) -> Result<(), Error> {
        let taken = self
            .users
            .exists_by_email(email)
            .await
            .map_err(Self::map_persistence_error)?;
        if taken {
            return Err(Self::duplicate_email());
        }
        Ok(())
    }
}

#[async_trait]
impl<R, C> UsersQuery for UserService<R, C>
where
    R: UserRepository + ?Sized,
    C: PokemonCatalog + ?Sized,
{
    async fn list_users(&self, cancel: &CancellationToken) -> Result<Vec<UserView>, Error> {
        let users = self
            .users
            .list_all()
            .await
            .map_err(Self::map_persistence_error)?;
        debug!(count = users.len(), "enriching user listing");
        Ok(join_all(users.iter().map(|user| self.enrich(user, cancel))).await)
    }

    async fn get_user(
        &self,
        id: UserId,
        cancel: &CancellationToken,
    ) -> Result<Option<UserView>, Error> {
        let Some(user) = self
            .users
            .find_by_id(id)
            .await
            .map_err(Self::map_persistence_error)?
        else {
            return Ok(None);
        };
        Ok(Some(self.enrich(&user, cancel).await))
    }

    async fn is_email_unique(&self, email: &EmailAddress) -> Result<bool, Error> {
        self.users
            .exists_by_email(email)
            .await
            .map(|taken| !taken)
            .map_err(Self::map_persistence_error)
    }
}

#[async_trait]
impl<R, C> UsersCommand for UserService<R, C>
where
    R: UserRepository + ?Sized,
    C: PokemonCatalog + ?Sized,
{
    async fn create_user(&self, user: NewUser) -> Result<UserView, Error> {
        self.ensure_email_free(&user.email).await?;
        let created = self
            .users
            .create(&user)
            .await
            .map_err(Self::map_persistence_error)?;
        info!(user_id = created.id().get(), "user created");
        Ok(UserView::from(&created))
    }

    async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<bool, Error> {
        let Some(current) = self
            .users
            .find_by_id(id)
            .await
            .map_err(Self::map_persistence_error)?
        else {
            return Ok(false);
        };

        if patch.is_empty() {
            debug!(user_id = id.get(), "empty patch; nothing to write");
            return Ok(true);
        }

        if let Some(email) = patch.email.as_ref().filter(|email| *email != current.email()) {
            self.ensure_email_free(email).await?;
        }

        let updated = current.merged(patch);
        let written = self
            .users
            .update(&updated)
            .await
            .map_err(Self::map_persistence_error)?;
        if written {
            info!(user_id = id.get(), "user updated");
        }
        Ok(written)
    }

    async fn delete_user(&self, id: UserId) -> Result<bool, Error> {
        let deleted = self
            .users
            .delete(id)
            .await
            .map_err(Self::map_persistence_error)?;
        if deleted {
            info!(user_id = id.get(), "user deleted");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
