//! Backend entry-point: loads settings, wires the user store and catalog, and
//! serves the REST API.

mod server;

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use server::{ServerConfig, create_server};
use trainer_roster::inbound::http::health::HealthState;
use trainer_roster::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use trainer_roster::outbound::pokeapi::PokeApiCatalog;
use trainer_roster::seed::seed_demo_users;
use trainer_roster::settings::AppSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let config = build_server_config(&settings).await?;

    if settings.seed_demo_users {
        seed_demo_users(config.user_repository().as_ref()).await;
    }

    let health_state = web::Data::new(HealthState::new());
    let bind_addr = settings.bind_addr();
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "trainer roster listening");
    let result = server.await;
    health_state.mark_unhealthy();
    result
}

async fn build_server_config(settings: &AppSettings) -> std::io::Result<ServerConfig> {
    let base_url = Url::parse(settings.pokeapi_base_url())
        .map_err(|e| std::io::Error::other(format!("invalid PokeAPI base URL: {e}")))?;
    let catalog = PokeApiCatalog::new(base_url, settings.pokeapi_timeout())
        .map_err(|e| std::io::Error::other(format!("failed to build PokeAPI client: {e}")))?;

    let config = ServerConfig::new(settings.bind_addr(), Arc::new(catalog))
        .with_lookup_timeout(settings.lookup_timeout());

    let Some(database_url) = settings.database_url() else {
        warn!("no database URL configured; users are kept in memory only");
        return Ok(config);
    };

    let pool = connect_database(database_url, settings.db_max_connections()).await?;
    Ok(config.with_db_pool(pool))
}

async fn connect_database(database_url: &str, max_connections: u32) -> std::io::Result<DbPool> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
        .await
        .map_err(|e| std::io::Error::other(format!("migration task failed: {e}")))?
        .map_err(|e| std::io::Error::other(format!("failed to apply migrations: {e}")))?;
    info!(applied = applied.len(), "database migrations up to date");

    let pool_config = PoolConfig::new(database_url).with_max_size(max_connections);
    DbPool::new(pool_config)
        .await
        .map_err(|e| std::io::Error::other(format!("failed to build database pool: {e}")))
}
