//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use trainer_roster::domain::DEFAULT_LOOKUP_TIMEOUT;
use trainer_roster::domain::ports::{PokemonCatalog, UserRepository};
use trainer_roster::outbound::memory::InMemoryUserRepository;
use trainer_roster::outbound::persistence::{DbPool, DieselUserRepository};

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) users: Arc<dyn UserRepository>,
    pub(crate) catalog: Arc<dyn PokemonCatalog>,
    pub(crate) lookup_timeout: Duration,
}

impl ServerConfig {
    /// Construct a configuration backed by the in-memory user store.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, catalog: Arc<dyn PokemonCatalog>) -> Self {
        Self {
            bind_addr,
            users: Arc::new(InMemoryUserRepository::new()),
            catalog,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Persist users in PostgreSQL through `pool`.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.users = Arc::new(DieselUserRepository::new(pool));
        self
    }

    /// Bound each catalog lookup made while enriching a user.
    #[must_use]
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// The user store the server will read and write.
    #[must_use]
    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        Arc::clone(&self.users)
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(dead_code, reason = "Exercised by server tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
