//! Application settings loaded via OrthoConfig.
//!
//! Values come from `TRAINER_*` environment variables, an optional
//! configuration file, and command-line flags. Every field is optional; the
//! accessors supply the defaults.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::DEFAULT_LOOKUP_TIMEOUT;
use crate::outbound::pokeapi::DEFAULT_POKEAPI_BASE_URL;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_POKEAPI_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Runtime configuration for the roster server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TRAINER")]
pub struct AppSettings {
    /// Interface to bind.
    pub host: Option<IpAddr>,
    /// TCP port to bind.
    pub port: Option<u16>,
    /// PostgreSQL connection URL. The in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Base URL of the PokeAPI `pokemon` resource.
    pub pokeapi_base_url: Option<String>,
    /// Whole-request timeout for one catalog call.
    pub pokeapi_timeout_ms: Option<u64>,
    /// Per-lookup bound applied by the enrichment fan-out.
    pub lookup_timeout_ms: Option<u64>,
    /// Insert demo users on startup when the store is empty.
    #[ortho_config(default = false)]
    pub seed_demo_users: bool,
}

impl AppSettings {
    /// Socket address for the HTTP listener.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(DEFAULT_HOST),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    pub fn pokeapi_base_url(&self) -> &str {
        self.pokeapi_base_url
            .as_deref()
            .unwrap_or(DEFAULT_POKEAPI_BASE_URL)
    }

    pub fn pokeapi_timeout(&self) -> Duration {
        self.pokeapi_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_POKEAPI_TIMEOUT)
    }

    pub fn lookup_timeout(&self) -> Duration {
        self.lookup_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_LOOKUP_TIMEOUT)
    }
}
