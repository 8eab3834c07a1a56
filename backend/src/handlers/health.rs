//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub cache: String,
    pub sources: Vec<String>,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache_status = if state.weather.cache().store().is_available() {
        "memory"
    } else {
        "disabled"
    };

    let weather = &state.config.weather;
    let sources = [
        ("openweather", &weather.openweather_api_key),
        ("accuweather", &weather.accuweather_api_key),
        ("openweather18m", &weather.openweather_api_key),
        ("climateNormals", &weather.visual_crossing_api_key),
    ]
    .into_iter()
    .filter(|(_, key)| key.as_deref().is_some_and(|k| !k.is_empty()))
    .map(|(source, _)| source.to_string())
    .collect();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache: cache_status.to_string(),
        sources,
    })
}
