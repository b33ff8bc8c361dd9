//! PokeAPI outbound adapter.
//!
//! This module provides a thin HTTP implementation of the `PokemonCatalog`
//! port backed by the public PokeAPI.

mod dto;
mod http_catalog;

pub use http_catalog::{DEFAULT_POKEAPI_BASE_URL, PokeApiCatalog};
