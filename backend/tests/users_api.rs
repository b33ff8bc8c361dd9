//! End-to-end behaviour of the users API over the in-memory store.
//!
//! The app is assembled exactly as the server does it: trace middleware,
//! extractor error handlers, the `/api/v1` scope, and health checks.

use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use async_trait::async_trait;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use trainer_roster::Trace;
use trainer_roster::domain::ports::{FixturePokemonCatalog, PokemonCatalog, PokemonCatalogError};
use trainer_roster::domain::{PokemonDetail, PokemonId, UserService};
use trainer_roster::inbound::http;
use trainer_roster::inbound::http::health::HealthState;
use trainer_roster::inbound::http::state::HttpState;
use trainer_roster::outbound::memory::InMemoryUserRepository;

fn detail(id: i32, name: &str, types: &[&str]) -> PokemonDetail {
    let mut detail = PokemonDetail::named(PokemonId::new(id).expect("valid id"), name);
    detail.types = Some(types.iter().map(|t| (*t).to_owned()).collect());
    detail.image_url = Some(format!("https://img.example/{id}.png"));
    detail
}

#[fixture]
fn catalog() -> Arc<FixturePokemonCatalog> {
    Arc::new(FixturePokemonCatalog::new([
        detail(1, "bulbasaur", &["grass", "poison"]),
        detail(25, "pikachu", &["electric"]),
        detail(150, "mewtwo", &["psychic"]),
    ]))
}

async fn init_app<C>(
    catalog: Arc<C>,
    lookup_timeout: Duration,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
where
    C: PokemonCatalog + 'static,
{
    let service = UserService::new(
        Arc::new(InMemoryUserRepository::new()),
        catalog,
        lookup_timeout,
    );
    test::init_service(
        App::new()
            .app_data(web::Data::new(HealthState::new()))
            .app_data(web::Data::new(HttpState::from_service(Arc::new(service))))
            .wrap(Trace)
            .configure(http::configure),
    )
    .await
}

fn create_body(name: &str, email: &str, pokemon_ids: &[i64]) -> Value {
    json!({
        "name": name,
        "email": email,
        "password": "default123",
        "pokemonIds": pokemon_ids,
    })
}

async fn create<S>(app: &S, body: Value) -> ServiceResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(body)
            .to_request(),
    )
    .await
}

async fn get_json<S>(app: &S, uri: &str) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(app, test::TestRequest::get().uri(uri).to_request()).await;
    let status = res.status();
    (status, test::read_body_json(res).await)
}

fn detail_names(user: &Value) -> Vec<&str> {
    user["pokemonDetails"]
        .as_array()
        .expect("pokemonDetails array")
        .iter()
        .map(|d| d["name"].as_str().expect("name"))
        .collect()
}

#[rstest]
#[actix_web::test]
async fn unknown_pokemon_are_dropped_from_details(catalog: Arc<FixturePokemonCatalog>) {
    let app = init_app(catalog.clone(), Duration::from_secs(1)).await;

    let res = create(&app, create_body("Ash", "ash@pallet.town", &[1, 25, 9999])).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let location = res
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("location header");
    let created: Value = test::read_body_json(res).await;
    assert_eq!(created["pokemonIds"], json!([1, 25, 9999]));
    assert!(created["pokemonDetails"].is_null());
    assert_eq!(catalog.lookup_count(), 0, "create must not call the catalog");

    let (status, user) = get_json(&app, &location).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["pokemonIds"], json!([1, 25, 9999]));
    let mut names = detail_names(&user);
    names.sort_unstable();
    assert_eq!(names, vec!["bulbasaur", "pikachu"]);
    assert_eq!(catalog.lookup_count(), 3);
}

#[rstest]
#[actix_web::test]
async fn list_enriches_every_user(catalog: Arc<FixturePokemonCatalog>) {
    let app = init_app(catalog, Duration::from_secs(1)).await;
    create(&app, create_body("Nicolas", "nicolarro20@gmail.com", &[1, 25, 150])).await;
    create(&app, create_body("Toto", "toto@gmail.com", &[])).await;

    let (status, body) = get_json(&app, "/api/v1/users").await;

    assert_eq!(status, StatusCode::OK);
    let users = body.as_array().expect("array");
    assert_eq!(users.len(), 2);
    assert_eq!(detail_names(&users[0]).len(), 3);
    assert_eq!(users[1]["pokemonDetails"], json!([]));
    assert!(users[0].get("password").is_none(), "password must never be serialised");
}

#[rstest]
#[actix_web::test]
async fn update_then_delete_lifecycle(catalog: Arc<FixturePokemonCatalog>) {
    let app = init_app(catalog, Duration::from_secs(1)).await;
    create(&app, create_body("Ash", "ash@pallet.town", &[25])).await;

    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri("/api/v1/users/1")
            .set_json(json!({"name": "Red", "pokemonIds": [150]}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let (_, user) = get_json(&app, "/api/v1/users/1").await;
    assert_eq!(user["name"], "Red");
    assert_eq!(user["email"], "ash@pallet.town");
    assert_eq!(detail_names(&user), vec!["mewtwo"]);

    let res = test::call_service(
        &app,
        test::TestRequest::delete().uri("/api/v1/users/1").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let (status, error) = get_json(&app, "/api/v1/users/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "not_found");
}

#[rstest]
#[actix_web::test]
async fn duplicate_email_is_a_conflict_with_trace(catalog: Arc<FixturePokemonCatalog>) {
    let app = init_app(catalog, Duration::from_secs(1)).await;
    create(&app, create_body("Ash", "ash@pallet.town", &[])).await;

    let res = create(&app, create_body("Gary", "ash@pallet.town", &[])).await;

    assert_eq!(res.status(), StatusCode::CONFLICT);
    let trace_id = res
        .headers()
        .get("trace-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("trace-id header");
    let error: Value = test::read_body_json(res).await;
    assert_eq!(error["code"], "conflict");
    assert_eq!(error["traceId"], trace_id.as_str());
    assert_eq!(error["details"]["field"], "email");

    let (_, availability) =
        get_json(&app, "/api/v1/users/email-availability?email=ash@pallet.town").await;
    assert_eq!(availability["available"], false);
}

#[rstest]
#[case::missing_email(json!({"name": "Ash", "password": "default123"}))]
#[case::bad_email(json!({"name": "Ash", "email": "nope", "password": "default123"}))]
#[case::short_password(json!({"name": "Ash", "email": "a@b.co", "password": "123"}))]
#[case::negative_pokemon(json!({"name": "Ash", "email": "a@b.co", "password": "default123", "pokemonIds": [-1]}))]
#[actix_web::test]
async fn invalid_creates_are_rejected(catalog: Arc<FixturePokemonCatalog>, #[case] body: Value) {
    let app = init_app(catalog, Duration::from_secs(1)).await;

    let res = create(&app, body).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let error: Value = test::read_body_json(res).await;
    assert_eq!(error["code"], "invalid_request");
}

struct SlowCatalog;

#[async_trait]
impl PokemonCatalog for SlowCatalog {
    async fn fetch_pokemon(&self, id: PokemonId) -> Result<PokemonDetail, PokemonCatalogError> {
        if id.get() == 25 {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        Ok(PokemonDetail::named(id, format!("pokemon-{id}")))
    }
}

#[actix_web::test]
async fn slow_lookups_are_omitted_not_awaited() {
    let app = init_app(Arc::new(SlowCatalog), Duration::from_millis(50)).await;
    create(&app, create_body("Ash", "ash@pallet.town", &[1, 25])).await;

    let started = std::time::Instant::now();
    let (status, user) = get_json(&app, "/api/v1/users/1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail_names(&user), vec!["pokemon-1"]);
    assert!(started.elapsed() < Duration::from_secs(5));
}
