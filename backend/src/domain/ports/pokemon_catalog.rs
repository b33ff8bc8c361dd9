//! Driven port for looking up Pokemon in an external catalog.
//!
//! The catalog is an optional dependency: it makes responses richer but is
//! never required for correctness. Every error variant therefore means
//! "unavailable" to callers, which drop the item instead of failing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::{PokemonDetail, PokemonId};

use super::define_port_error;

define_port_error! {
    /// Reasons a single catalog lookup produced no detail.
    pub enum PokemonCatalogError {
        /// The catalog does not know the identifier.
        NotFound { id: i32 } => "pokemon {id} not found in catalog",
        /// The catalog throttled the request.
        RateLimited { message: String } => "pokemon catalog rate limited request: {message}",
        /// The lookup exceeded its deadline.
        Timeout { message: String } => "pokemon catalog timeout: {message}",
        /// The catalog answered with an unexpected status.
        Status { status: u16, message: String } =>
            "pokemon catalog returned status {status}: {message}",
        /// Network transport failed before a response arrived.
        Transport { message: String } => "pokemon catalog transport failed: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "pokemon catalog response invalid: {message}",
    }
}

/// Driven port fetching one Pokemon by identifier.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PokemonCatalog: Send + Sync {
    /// Fetch the detail for `id`.
    ///
    /// # Examples
    /// ```
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// use trainer_roster::domain::ports::{FixturePokemonCatalog, PokemonCatalog};
    /// use trainer_roster::domain::{PokemonDetail, PokemonId};
    ///
    /// let pikachu = PokemonId::new(25).expect("valid id");
    /// let catalog = FixturePokemonCatalog::new([PokemonDetail::named(pikachu, "pikachu")]);
    /// let detail = catalog.fetch_pokemon(pikachu).await?;
    /// assert_eq!(detail.name, "pikachu");
    /// # Ok::<(), trainer_roster::domain::ports::PokemonCatalogError>(())
    /// # }).unwrap();
    /// ```
    async fn fetch_pokemon(&self, id: PokemonId) -> Result<PokemonDetail, PokemonCatalogError>;
}

/// In-memory catalog keyed by identifier.
///
/// Unknown identifiers yield [`PokemonCatalogError::NotFound`]. The number of
/// lookups served is recorded so callers can assert on fan-out behaviour.
#[derive(Debug, Default)]
pub struct FixturePokemonCatalog {
    entries: HashMap<PokemonId, PokemonDetail>,
    lookups: AtomicUsize,
}

impl FixturePokemonCatalog {
    /// Build a catalog holding `details`.
    pub fn new(details: impl IntoIterator<Item = PokemonDetail>) -> Self {
        Self {
            entries: details
                .into_iter()
                .map(|detail| (detail.id, detail))
                .collect(),
            lookups: AtomicUsize::new(0),
        }
    }

    /// Number of `fetch_pokemon` calls served so far.
    #[must_use]
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::Acquire)
    }
}

#[async_trait]
impl PokemonCatalog for FixturePokemonCatalog {
    async fn fetch_pokemon(&self, id: PokemonId) -> Result<PokemonDetail, PokemonCatalogError> {
        self.lookups.fetch_add(1, Ordering::AcqRel);
        self.entries
            .get(&id)
            .cloned()
            .ok_or_else(|| PokemonCatalogError::not_found(id.get()))
    }
}
