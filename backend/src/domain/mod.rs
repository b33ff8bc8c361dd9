//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, plus the services implementing the user use-cases.
//! Keep types immutable and document invariants in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User, NewUser, UserPatch, UserView: the user aggregate and its shapes.
//! - PokemonId, PokemonDetail: catalog identifiers and resolved details.
//! - PokemonFanout: concurrent, failure-tolerant catalog lookups.
//! - UserService: implementation of the `UsersQuery`/`UsersCommand` ports.

pub mod error;
pub mod pokemon;
pub mod pokemon_fanout;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::pokemon::{InvalidPokemonId, PokemonDetail, PokemonId};
pub use self::pokemon_fanout::{DEFAULT_LOOKUP_TIMEOUT, PokemonFanout};
pub use self::trace_id::TraceId;
pub use self::user::{
    DISPLAY_NAME_MAX, DisplayName, EMAIL_MAX, EmailAddress, NewUser, PASSWORD_MAX, PASSWORD_MIN,
    Password, User, UserId, UserPatch, UserValidationError, UserView,
};
pub use self::user_service::UserService;

/// HTTP header name used to propagate trace identifiers.
pub const TRACE_ID_HEADER: &str = "trace-id";

