//! Router configuration for the web server.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/reset", post(handlers::form_reset))
        // JSON API
        .route("/api/scan", post(handlers::api_scan))
        .route("/api/state", get(handlers::api_state))
        .route("/api/reset", post(handlers::api_reset))
        // Uploads are forwarded whole, whatever their size.
        .layer(DefaultBodyLimit::disable())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
