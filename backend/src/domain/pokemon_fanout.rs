//! Concurrent catalog fan-out.
//!
//! [`PokemonFanout`] resolves a batch of identifiers against a
//! [`PokemonCatalog`] concurrently. Lookups that fail, time out, or are still
//! pending when the caller cancels are dropped from the result; the batch as a
//! whole never fails.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::ports::{PokemonCatalog, PokemonCatalogError};
use super::{PokemonDetail, PokemonId};

/// Default upper bound for a single catalog lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(3);

/// Fan-out aggregator over a catalog port.
///
/// Identifiers are de-duplicated before any request is issued, so each
/// distinct identifier is looked up once and appears at most once in the
/// output. Output order is unspecified.
pub struct PokemonFanout<C: ?Sized> {
    catalog: Arc<C>,
    lookup_timeout: Duration,
}

impl<C: ?Sized> Clone for PokemonFanout<C> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            lookup_timeout: self.lookup_timeout,
        }
    }
}

impl<C> PokemonFanout<C>
where
    C: PokemonCatalog + ?Sized,
{
    /// Create an aggregator bounding each lookup by `lookup_timeout`.
    pub fn new(catalog: Arc<C>, lookup_timeout: Duration) -> Self {
        Self {
            catalog,
            lookup_timeout,
        }
    }

    /// Resolve `ids` concurrently and return the details that succeeded.
    ///
    /// Empty input (including `None`) returns immediately without touching
    /// the catalog. When `cancel` fires, in-flight lookups are dropped and
    /// the details gathered so far are returned.
    ///
    /// # Examples
    /// ```
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// use tokio_util::sync::CancellationToken;
    /// use trainer_roster::domain::ports::FixturePokemonCatalog;
    /// use trainer_roster::domain::{PokemonDetail, PokemonFanout, PokemonId};
    ///
    /// let bulbasaur = PokemonId::new(1).expect("valid id");
    /// let unknown = PokemonId::new(9999).expect("valid id");
    /// let catalog = Arc::new(FixturePokemonCatalog::new([
    ///     PokemonDetail::named(bulbasaur, "bulbasaur"),
    /// ]));
    /// let fanout = PokemonFanout::new(catalog, Duration::from_secs(1));
    ///
    /// let details = fanout
    ///     .fetch_many([bulbasaur, unknown], &CancellationToken::new())
    ///     .await;
    /// assert_eq!(details.len(), 1);
    /// # });
    /// ```
    pub async fn fetch_many<I>(&self, ids: I, cancel: &CancellationToken) -> Vec<PokemonDetail>
    where
        I: IntoIterator<Item = PokemonId>,
    {
        let unique: BTreeSet<PokemonId> = ids.into_iter().collect();
        if unique.is_empty() {
            return Vec::new();
        }

        let requested = unique.len();
        let mut lookups: FuturesUnordered<_> =
            unique.into_iter().map(|id| self.lookup(id)).collect();
        let mut details = Vec::with_capacity(requested);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!(
                        requested,
                        resolved = details.len(),
                        abandoned = lookups.len(),
                        "pokemon fan-out cancelled"
                    );
                    break;
                }
                next = lookups.next() => match next {
                    Some(Some(detail)) => details.push(detail),
                    Some(None) => {}
                    None => break,
                },
            }
        }

        details
    }

    async fn lookup(&self, id: PokemonId) -> Option<PokemonDetail> {
        match tokio::time::timeout(self.lookup_timeout, self.catalog.fetch_pokemon(id)).await {
            Ok(Ok(detail)) => Some(detail),
            Ok(Err(PokemonCatalogError::NotFound { .. })) => {
                debug!(pokemon_id = id.get(), "pokemon not found in catalog");
                None
            }
            Ok(Err(error)) => {
                warn!(pokemon_id = id.get(), %error, "pokemon lookup failed");
                None
            }
            Err(_) => {
                warn!(
                    pokemon_id = id.get(),
                    timeout_ms = u64::try_from(self.lookup_timeout.as_millis()).unwrap_or(u64::MAX),
                    "pokemon lookup timed out"
                );
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "pokemon_fanout_tests.rs"]
mod tests;
