//! Route definitions for the Tripcast weather service

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Weather batch lookup, POST only
        .route(
            "/weather",
            post(handlers::lookup_weather).fallback(handlers::method_not_allowed),
        )
}
