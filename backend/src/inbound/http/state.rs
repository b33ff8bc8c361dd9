//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on the driving ports and remain testable with mocks.

use std::sync::Arc;

use crate::domain::ports::{UsersCommand, UsersQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
}

impl HttpState {
    /// Bundle the read and write ports.
    pub fn new(users: Arc<dyn UsersQuery>, users_command: Arc<dyn UsersCommand>) -> Self {
        Self {
            users,
            users_command,
        }
    }

    /// Build state from one service implementing both ports.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// use trainer_roster::domain::UserService;
    /// use trainer_roster::domain::ports::FixturePokemonCatalog;
    /// use trainer_roster::inbound::http::state::HttpState;
    /// use trainer_roster::outbound::memory::InMemoryUserRepository;
    ///
    /// let service = UserService::new(
    ///     Arc::new(InMemoryUserRepository::new()),
    ///     Arc::new(FixturePokemonCatalog::default()),
    ///     Duration::from_secs(1),
    /// );
    /// let _state = HttpState::from_service(Arc::new(service));
    /// ```
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: UsersQuery + UsersCommand + 'static,
    {
        Self {
            users: service.clone(),
            users_command: service,
        }
    }
}
