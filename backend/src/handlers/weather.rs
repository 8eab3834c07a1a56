//! HTTP handlers for the weather batch endpoint

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use shared::{WeatherRequest, WeatherResponse};

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Weather for a batch of itinerary days, keyed by date
pub async fn lookup_weather(
    State(state): State<AppState>,
    payload: Result<Json<WeatherRequest>, JsonRejection>,
) -> AppResult<Json<WeatherResponse>> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    tracing::debug!(days = request.days.len(), "Weather batch requested");
    let response = state.weather.lookup_days(request.days).await?;
    Ok(Json(response))
}

/// Any method other than POST on the weather endpoint
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
