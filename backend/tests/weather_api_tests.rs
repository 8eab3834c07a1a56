//! Weather API integration tests
//!
//! Drives the router end to end with stub fetchers behind the cache.

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use shared::{WeatherIcon, WeatherRecord, WeatherSource};
use std::time::Duration;
use tokio::time::Instant;
use tower::ServiceExt;

use common::{date, Harness, StoreKind, StubFetcher};
use tripcast_backend::create_app;

fn app(h: &Harness) -> Router {
    create_app(h.app_state())
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn post_raw(app: Router, body: &str, content_type: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(Method::POST).uri("/api/v1/weather");
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }

    let response = app
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

// ============================================================================
// Batch lookups
// ============================================================================

#[tokio::test]
async fn test_single_day_end_to_end() {
    let record = WeatherRecord::new(
        date("2025-01-01"),
        WeatherSource::OpenWeather,
        5.0,
        1.0,
        0.0,
        WeatherIcon::Clear,
    )
    .unwrap();
    let h = Harness::with_openweather(date("2024-12-28"), StubFetcher::returning(record));

    let (status, body) = send(
        app(&h),
        Method::POST,
        "/api/v1/weather",
        Some(json!({
            "days": [
                { "day_id": "d1", "date": "2025-01-01", "latitude": 48.85, "longitude": 2.35 }
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "2025-01-01": {
                "isoDate": "2025-01-01",
                "source": "openweather",
                "hiC": 5.0,
                "loC": 1.0,
                "precipMM": 0.0,
                "icon": "01d",
                "confidence": "high"
            }
        })
    );
    assert_eq!(h.openweather.calls(), 1);
}

#[tokio::test]
async fn test_batch_is_resilient_to_bad_days() {
    let h = Harness::new(date("2024-12-28"));
    h.openweather.fail_on(date("2025-01-03"));

    let (status, body) = send(
        app(&h),
        Method::POST,
        "/api/v1/weather",
        Some(json!({
            "days": [
                { "day_id": "d1", "date": "2025-01-01", "latitude": 48.85, "longitude": 2.35 },
                { "day_id": "d2", "date": "2025-01-02" },
                { "day_id": "d3", "date": "2025-01-03", "latitude": 48.85, "longitude": 2.35 },
                { "day_id": "d4", "date": "2025-01-20", "latitude": 41.9, "longitude": 12.5 },
                { "day_id": "d5", "date": "2025-06-01", "latitude": 41.9, "longitude": 12.5 }
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let map = body.as_object().expect("object keyed by date");
    assert_eq!(map.len(), 5);
    assert!(map["2025-01-02"].is_null());
    assert!(map["2025-01-03"].is_null());
    assert_eq!(map["2025-01-01"]["source"], "openweather");
    assert_eq!(map["2025-01-20"]["source"], "accuweather");
    assert_eq!(map["2025-01-20"]["confidence"], "medium");
    assert_eq!(map["2025-06-01"]["source"], "openweather18m");
    assert_eq!(map["2025-06-01"]["confidence"], "low");
}

#[tokio::test]
async fn test_invalid_days_are_null() {
    let h = Harness::new(date("2024-12-28"));

    let (status, body) = send(
        app(&h),
        Method::POST,
        "/api/v1/weather",
        Some(json!({
            "days": [
                { "day_id": "past", "date": "2024-12-01", "latitude": 48.85, "longitude": 2.35 },
                { "day_id": "bad-date", "date": "2025-13-01", "latitude": 48.85, "longitude": 2.35 },
                { "day_id": "bad-lat", "date": "2025-01-01", "latitude": 95.0, "longitude": 2.35 }
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "2024-12-01": null, "2025-13-01": null, "2025-01-01": null })
    );
    assert_eq!(h.total_calls(), 0);
}

#[tokio::test]
async fn test_malformed_day_does_not_reject_batch() {
    let h = Harness::new(date("2024-12-28"));

    let (status, body) = send(
        app(&h),
        Method::POST,
        "/api/v1/weather",
        Some(json!({
            "days": [
                { "day_id": "d1", "date": "2025-01-01", "latitude": 48.85, "longitude": 2.35 },
                { "day_id": "d2", "date": "2025-01-02", "latitude": "48.85", "longitude": 2.35 }
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let map = body.as_object().expect("object keyed by date");
    assert_eq!(map.len(), 2);
    assert_eq!(map["2025-01-01"]["source"], "openweather");
    assert!(map["2025-01-02"].is_null());
    assert_eq!(h.openweather.calls(), 1);
}

#[tokio::test]
async fn test_day_without_id_is_still_looked_up() {
    let h = Harness::new(date("2024-12-28"));

    let (status, body) = send(
        app(&h),
        Method::POST,
        "/api/v1/weather",
        Some(json!({
            "days": [
                { "date": "2025-01-02", "latitude": 48.85, "longitude": 2.35 },
                { "day_id": "no-date", "latitude": 48.85, "longitude": 2.35 },
                "2025-01-03"
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let map = body.as_object().expect("object keyed by date");
    assert_eq!(map.len(), 1);
    assert_eq!(map["2025-01-02"]["source"], "openweather");
}

#[tokio::test(start_paused = true)]
async fn test_batch_days_are_looked_up_concurrently() {
    let slow = StubFetcher::slow(WeatherSource::OpenWeather, Duration::from_secs(5));
    let h = Harness::with_openweather(date("2024-12-28"), slow);

    let started = Instant::now();
    let (status, body) = send(
        app(&h),
        Method::POST,
        "/api/v1/weather",
        Some(json!({
            "days": [
                { "day_id": "d1", "date": "2025-01-01", "latitude": 48.85, "longitude": 2.35 },
                { "day_id": "d2", "date": "2025-01-02", "latitude": 48.85, "longitude": 2.35 },
                { "day_id": "d3", "date": "2025-01-03", "latitude": 48.85, "longitude": 2.35 }
            ]
        })),
    )
    .await;
    let elapsed = started.elapsed();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_object().map(|m| m.len()), Some(3));
    assert_eq!(h.openweather.calls(), 3);
    assert!(elapsed >= Duration::from_secs(5), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(10), "elapsed {:?}", elapsed);
}

#[tokio::test]
async fn test_empty_batch_returns_empty_object() {
    let h = Harness::new(date("2024-12-28"));

    let (status, body) = send(
        app(&h),
        Method::POST,
        "/api/v1/weather",
        Some(json!({ "days": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn test_repeat_request_uses_cache() {
    let h = Harness::new(date("2024-12-28"));
    let request = json!({
        "days": [{ "day_id": "d1", "date": "2025-01-01", "latitude": 48.85, "longitude": 2.35 }]
    });

    let (_, first) = send(app(&h), Method::POST, "/api/v1/weather", Some(request.clone())).await;
    let (_, second) = send(app(&h), Method::POST, "/api/v1/weather", Some(request)).await;

    assert_eq!(first, second);
    assert_eq!(h.openweather.calls(), 1);
}

#[tokio::test]
async fn test_cache_disabled_still_serves_weather() {
    let h = Harness::with_store(date("2024-12-28"), StoreKind::Unavailable);

    let (status, body) = send(
        app(&h),
        Method::POST,
        "/api/v1/weather",
        Some(json!({
            "days": [{ "day_id": "d1", "date": "2025-01-01", "latitude": 48.85, "longitude": 2.35 }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["2025-01-01"]["source"], "openweather");
}

// ============================================================================
// Request validation
// ============================================================================

#[tokio::test]
async fn test_get_is_method_not_allowed() {
    let h = Harness::new(date("2024-12-28"));

    let (status, body) = send(app(&h), Method::GET, "/api/v1/weather", None).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"]["code"], "METHOD_NOT_ALLOWED");
    assert_eq!(h.total_calls(), 0);
}

#[tokio::test]
async fn test_put_is_method_not_allowed() {
    let h = Harness::new(date("2024-12-28"));

    let (status, _) = send(
        app(&h),
        Method::PUT,
        "/api/v1/weather",
        Some(json!({ "days": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_missing_days_is_bad_request() {
    let h = Harness::new(date("2024-12-28"));

    let (status, body) = send(app(&h), Method::POST, "/api/v1/weather", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_days_not_a_list_is_bad_request() {
    let h = Harness::new(date("2024-12-28"));

    let (status, _) = send(
        app(&h),
        Method::POST,
        "/api/v1/weather",
        Some(json!({ "days": "2025-01-01" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let h = Harness::new(date("2024-12-28"));

    let (status, body) = post_raw(app(&h), "{\"days\": [", Some("application/json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_missing_content_type_is_bad_request() {
    let h = Harness::new(date("2024-12-28"));

    let (status, _) = post_raw(app(&h), "{\"days\": []}", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_batch_is_bad_request() {
    let h = Harness::new(date("2024-12-28"));
    let days: Vec<Value> = (0..11)
        .map(|i| {
            json!({
                "day_id": format!("d{}", i),
                "date": (date("2025-01-01") + chrono::Duration::days(i)).to_string(),
                "latitude": 48.85,
                "longitude": 2.35
            })
        })
        .collect();

    let (status, body) = send(
        app(&h),
        Method::POST,
        "/api/v1/weather",
        Some(json!({ "days": days })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap_or_default()
        .contains("At most 10"));
    assert_eq!(h.total_calls(), 0);
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_reports_cache_and_configured_sources() {
    let h = Harness::new(date("2024-12-28"));

    let (status, body) = send(app(&h), Method::GET, "/api/v1/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["cache"], "memory");
    assert_eq!(
        body["sources"],
        json!(["openweather", "openweather18m", "climateNormals"])
    );
}

#[tokio::test]
async fn test_health_reports_disabled_cache() {
    let h = Harness::with_store(date("2024-12-28"), StoreKind::Unavailable);

    let (status, body) = send(app(&h), Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cache"], "disabled");
}
