//! Tests for the concurrent catalog fan-out.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rstest::{fixture, rstest};
use tokio::time::Instant;

use super::*;
use crate::domain::ports::{FixturePokemonCatalog, MockPokemonCatalog};

fn id(raw: i32) -> PokemonId {
    PokemonId::new(raw).expect("fixture ids are positive")
}

#[fixture]
fn catalog() -> Arc<FixturePokemonCatalog> {
    Arc::new(FixturePokemonCatalog::new([
        PokemonDetail::named(id(1), "bulbasaur"),
        PokemonDetail::named(id(25), "pikachu"),
        PokemonDetail::named(id(150), "mewtwo"),
    ]))
}

fn sorted_names(details: &[PokemonDetail]) -> Vec<&str> {
    let mut names: Vec<&str> = details.iter().map(|detail| detail.name.as_str()).collect();
    names.sort_unstable();
    names
}

/// Catalog answering instantly for fast ids and stalling on the rest.
struct StallingCatalog {
    stalled: Vec<PokemonId>,
    stall: Duration,
    started: AtomicUsize,
}

impl StallingCatalog {
    fn new(stalled: impl IntoIterator<Item = PokemonId>, stall: Duration) -> Self {
        Self {
            stalled: stalled.into_iter().collect(),
            stall,
            started: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PokemonCatalog for StallingCatalog {
    async fn fetch_pokemon(&self, id: PokemonId) -> Result<PokemonDetail, PokemonCatalogError> {
        self.started.fetch_add(1, Ordering::AcqRel);
        if self.stalled.contains(&id) {
            tokio::time::sleep(self.stall).await;
        }
        Ok(PokemonDetail::named(id, format!("pokemon-{id}")))
    }
}

#[rstest]
#[tokio::test]
async fn resolves_every_known_id(catalog: Arc<FixturePokemonCatalog>) {
    let fanout = PokemonFanout::new(Arc::clone(&catalog), Duration::from_secs(1));

    let details = fanout
        .fetch_many([id(1), id(25), id(150)], &CancellationToken::new())
        .await;

    assert_eq!(sorted_names(&details), ["bulbasaur", "mewtwo", "pikachu"]);
    assert_eq!(catalog.lookup_count(), 3);
}

#[rstest]
#[tokio::test]
async fn drops_unknown_ids(catalog: Arc<FixturePokemonCatalog>) {
    let fanout = PokemonFanout::new(catalog, Duration::from_secs(1));

    let details = fanout
        .fetch_many([id(1), id(9999)], &CancellationToken::new())
        .await;

    assert_eq!(sorted_names(&details), ["bulbasaur"]);
}

#[rstest]
#[case::empty_list(Some(Vec::new()))]
#[case::absent_list(None)]
#[tokio::test]
async fn empty_input_skips_the_catalog(#[case] ids: Option<Vec<PokemonId>>) {
    let mut catalog = MockPokemonCatalog::new();
    catalog.expect_fetch_pokemon().times(0);
    let fanout = PokemonFanout::new(Arc::new(catalog), Duration::from_secs(1));

    let details = fanout
        .fetch_many(ids.into_iter().flatten(), &CancellationToken::new())
        .await;

    assert!(details.is_empty());
}

#[tokio::test]
async fn duplicate_ids_are_looked_up_once() {
    let mut catalog = MockPokemonCatalog::new();
    catalog
        .expect_fetch_pokemon()
        .withf(|requested| requested.get() == 25)
        .times(1)
        .returning(|requested| Ok(PokemonDetail::named(requested, "pikachu")));
    let fanout = PokemonFanout::new(Arc::new(catalog), Duration::from_secs(1));

    let details = fanout
        .fetch_many([id(25), id(25), id(25)], &CancellationToken::new())
        .await;

    assert_eq!(sorted_names(&details), ["pikachu"]);
}

#[rstest]
#[case::rate_limited(PokemonCatalogError::rate_limited("slow down"))]
#[case::upstream_status(PokemonCatalogError::status(502_u16, "bad gateway"))]
#[case::transport(PokemonCatalogError::transport("connection reset"))]
#[case::decode(PokemonCatalogError::decode("missing name"))]
#[tokio::test]
async fn absorbs_catalog_failures(#[case] failure: PokemonCatalogError) {
    let mut catalog = MockPokemonCatalog::new();
    catalog
        .expect_fetch_pokemon()
        .withf(|requested| requested.get() == 1)
        .times(1)
        .return_once(move |_| Err(failure));
    catalog
        .expect_fetch_pokemon()
        .withf(|requested| requested.get() == 25)
        .times(1)
        .returning(|requested| Ok(PokemonDetail::named(requested, "pikachu")));
    let fanout = PokemonFanout::new(Arc::new(catalog), Duration::from_secs(1));

    let details = fanout
        .fetch_many([id(1), id(25)], &CancellationToken::new())
        .await;

    assert_eq!(sorted_names(&details), ["pikachu"]);
}

#[tokio::test(start_paused = true)]
async fn slow_lookups_are_bounded_by_the_single_lookup_timeout() {
    let catalog = Arc::new(StallingCatalog::new(
        [id(2), id(3)],
        Duration::from_secs(60),
    ));
    let fanout = PokemonFanout::new(Arc::clone(&catalog), Duration::from_secs(1));
    let started = Instant::now();

    let details = fanout
        .fetch_many([id(1), id(2), id(3), id(4)], &CancellationToken::new())
        .await;

    let elapsed = started.elapsed();
    assert_eq!(sorted_names(&details), ["pokemon-1", "pokemon-4"]);
    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
    assert_eq!(catalog.started.load(Ordering::Acquire), 4);
}

#[tokio::test(start_paused = true)]
async fn cancellation_returns_partial_results_promptly() {
    let catalog = Arc::new(StallingCatalog::new([id(150)], Duration::from_secs(60)));
    let fanout = PokemonFanout::new(catalog, Duration::from_secs(30));
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        trigger.cancel();
    });
    let started = Instant::now();

    let details = fanout.fetch_many([id(1), id(150)], &cancel).await;

    assert_eq!(sorted_names(&details), ["pokemon-1"]);
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn already_cancelled_token_skips_waiting() {
    let catalog = Arc::new(StallingCatalog::new([id(1)], Duration::from_secs(60)));
    let fanout = PokemonFanout::new(catalog, Duration::from_secs(30));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let details = fanout.fetch_many([id(1)], &cancel).await;

    assert!(details.is_empty());
}
