//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod users;
pub(crate) mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register the REST API, its extractor error handlers, and the health checks.
///
/// Callers supply `web::Data<HttpState>` and `web::Data<HealthState>` as app
/// data and wrap the app with [`crate::Trace`].
pub fn configure(cfg: &mut web::ServiceConfig) {
    error::configure_extractors(cfg);
    cfg.service(web::scope("/api/v1").configure(users::configure))
        .service(health::ready)
        .service(health::live);
}
