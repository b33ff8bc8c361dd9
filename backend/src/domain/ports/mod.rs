//! Domain ports.
//!
//! Driven ports (`UserRepository`, `PokemonCatalog`) are implemented by
//! outbound adapters; driving ports (`UsersQuery`, `UsersCommand`) are
//! implemented by domain services and consumed by inbound adapters.

mod macros;
mod pokemon_catalog;
mod user_repository;
mod users_command;
mod users_query;

pub(crate) use macros::define_port_error;

#[cfg(test)]
pub use pokemon_catalog::MockPokemonCatalog;
pub use pokemon_catalog::{FixturePokemonCatalog, PokemonCatalog, PokemonCatalogError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::UsersCommand;
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
