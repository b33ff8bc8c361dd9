//! Mutex-guarded `UserRepository` kept entirely in memory.
//!
//! Identifiers are assigned from a monotonically increasing counter starting
//! at 1, mirroring a serial column. Email uniqueness is enforced the same way
//! the database index does it, so services behave identically on both
//! adapters.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, NewUser, User, UserId};

#[derive(Debug, Default)]
struct Store {
    next_id: i32,
    users: BTreeMap<UserId, User>,
}

impl Store {
    fn email_taken(&self, email: &EmailAddress, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|user| user.email() == email && Some(user.id()) != except)
    }
}

/// In-memory implementation of the `UserRepository` port.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    store: Mutex<Store>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, UserPersistenceError> {
        self.store
            .lock()
            .map_err(|_| UserPersistenceError::query("in-memory user store lock poisoned"))
    }
}

fn duplicate_email(email: &EmailAddress) -> UserPersistenceError {
    UserPersistenceError::conflict(format!("email {email} already stored"))
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.lock()?.users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock()?.users.get(&id).cloned())
    }

    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut store = self.lock()?;
        if store.email_taken(&user.email, None) {
            return Err(duplicate_email(&user.email));
        }
        let raw_id = store
            .next_id
            .checked_add(1)
            .ok_or_else(|| UserPersistenceError::query("user id sequence exhausted"))?;
        let id = UserId::new(raw_id)
            .map_err(|error| UserPersistenceError::query(error.to_string()))?;
        store.next_id = raw_id;
        let created = User::new(id, user.clone());
        store.users.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut store = self.lock()?;
        if !store.users.contains_key(&user.id()) {
            return Ok(false);
        }
        if store.email_taken(user.email(), Some(user.id())) {
            return Err(duplicate_email(user.email()));
        }
        store.users.insert(user.id(), user.clone());
        Ok(true)
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        Ok(self.lock()?.users.remove(&id).is_some())
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserPersistenceError> {
        Ok(self.lock()?.email_taken(email, None))
    }
}
