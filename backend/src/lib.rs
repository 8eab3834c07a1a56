//! Tripcast weather service
//!
//! Resolves weather for itinerary days: picks a provider from the forecast
//! horizon, fetches and normalizes its data, and caches the result.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod clock;
pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;

use crate::clock::Clock;
use crate::error::AppError;
use crate::external::{RetryPolicy, UpstreamHttp};
use crate::services::{CacheClient, MemoryStore, SourceFetchers, WeatherCache, WeatherService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub weather: WeatherService,
}

impl AppState {
    /// Wire the HTTP-backed fetchers, cache store and weather service
    pub fn from_config(config: Config, clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        let http = UpstreamHttp::new(
            config.weather.request_timeout(),
            RetryPolicy::from(&config.retry),
        )
        .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;

        let fetchers = SourceFetchers::from_config(&config.weather, http, clock.clone());

        let store = if config.cache.enabled {
            CacheClient::Available(Arc::new(MemoryStore::new(clock.clone())))
        } else {
            tracing::warn!("Weather cache disabled, every lookup goes upstream");
            CacheClient::Unavailable
        };

        let cache = WeatherCache::new(store, fetchers, clock);
        let weather = WeatherService::new(cache, config.weather.max_days_per_request);

        Ok(Self {
            config: Arc::new(config),
            weather,
        })
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Tripcast Weather API v1.0"
}
