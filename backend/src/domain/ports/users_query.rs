//! Driving port for user-facing reads.
//!
//! Inbound adapters use this port to fetch enriched user views without
//! importing persistence or catalog concerns.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::{EmailAddress, Error, UserId, UserView};

/// Read use-cases over users.
///
/// The cancellation token bounds catalog enrichment: once it fires, pending
/// lookups are abandoned and the views carry whatever resolved so far.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// List every user with catalog details attached.
    async fn list_users(&self, cancel: &CancellationToken) -> Result<Vec<UserView>, Error>;

    /// Fetch one enriched user; `None` when no record exists.
    async fn get_user(
        &self,
        id: UserId,
        cancel: &CancellationToken,
    ) -> Result<Option<UserView>, Error>;

    /// Whether `email` is still free, i.e. no stored user owns it.
    async fn is_email_unique(&self, email: &EmailAddress) -> Result<bool, Error>;
}
