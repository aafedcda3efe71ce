//! HTTP route configuration.
//!
//! - `GET  /health` — liveness probe, no database contact
//! - `POST /api/test-connection` — probe an ad-hoc descriptor
//! - `POST /api/query` — execute SQL against the shared pool

use actix_web::web;

use super::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health)).service(
        web::scope("/api")
            .route("/test-connection", web::post().to(handlers::test_connection))
            .route("/query", web::post().to(handlers::query)),
    );
}
