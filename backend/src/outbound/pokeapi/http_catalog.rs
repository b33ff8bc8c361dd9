//! Reqwest-backed PokeAPI catalog adapter.
//!
//! This adapter owns transport details only: URL construction, timeout and
//! HTTP error mapping, and JSON decoding into domain details.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::PokemonDto;
use crate::domain::ports::{PokemonCatalog, PokemonCatalogError};
use crate::domain::{PokemonDetail, PokemonId};

/// Public PokeAPI collection used when no base URL is configured.
pub const DEFAULT_POKEAPI_BASE_URL: &str = "https://pokeapi.co/api/v2/pokemon";

const USER_AGENT: &str = concat!("trainer-roster/", env!("CARGO_PKG_VERSION"));

/// Catalog adapter issuing `GET <base>/<id>` against one PokeAPI collection.
///
/// The underlying client is shared across lookups so connections are pooled.
#[derive(Clone)]
pub struct PokeApiCatalog {
    client: Client,
    base_url: Url,
}

impl PokeApiCatalog {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, base_url })
    }

    fn pokemon_url(&self, id: PokemonId) -> Result<Url, PokemonCatalogError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                PokemonCatalogError::transport(format!(
                    "catalog base URL {} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push(&id.to_string());
        Ok(url)
    }
}

#[async_trait]
impl PokemonCatalog for PokeApiCatalog {
    async fn fetch_pokemon(&self, id: PokemonId) -> Result<PokemonDetail, PokemonCatalogError> {
        let url = self.pokemon_url(id)?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(id, status, body.as_ref()));
        }

        parse_pokemon(body.as_ref())
    }
}

fn parse_pokemon(body: &[u8]) -> Result<PokemonDetail, PokemonCatalogError> {
    let decoded: PokemonDto = serde_json::from_slice(body).map_err(|error| {
        PokemonCatalogError::decode(format!("invalid PokeAPI JSON payload: {error}"))
    })?;
    decoded.into_domain().map_err(PokemonCatalogError::decode)
}

fn map_transport_error(error: reqwest::Error) -> PokemonCatalogError {
    if error.is_timeout() {
        PokemonCatalogError::timeout(error.to_string())
    } else {
        PokemonCatalogError::transport(error.to_string())
    }
}

fn map_status_error(id: PokemonId, status: StatusCode, body: &[u8]) -> PokemonCatalogError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::NOT_FOUND => PokemonCatalogError::not_found(id.get()),
        StatusCode::TOO_MANY_REQUESTS => PokemonCatalogError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            PokemonCatalogError::timeout(message)
        }
        _ => PokemonCatalogError::status(status.as_u16(), message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
