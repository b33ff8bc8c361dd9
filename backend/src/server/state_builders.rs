//! Builders for HTTP state from the configured adapters.

use actix_web::web;

use trainer_roster::domain::UserService;
use trainer_roster::inbound::http::state::HttpState;

use super::ServerConfig;

/// Wire the user service over the configured store and catalog.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let service = UserService::new(
        config.user_repository(),
        config.catalog.clone(),
        config.lookup_timeout,
    );
    web::Data::new(HttpState::from_service(std::sync::Arc::new(service)))
}
