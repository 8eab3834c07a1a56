//! Read-through weather cache
//!
//! Lookups are keyed by (date, latitude, longitude). A miss selects a source
//! from the forecast horizon, fetches, and stores successful records with a
//! source-dependent TTL. Failed fetches and past dates are never cached.

use chrono::{Duration, NaiveDate};
use shared::{GpsCoordinates, WeatherRecord, WeatherSource};
use std::sync::Arc;

use crate::clock::Clock;
use crate::config::WeatherConfig;
use crate::external::{
    AccuWeatherClient, ClimateNormalsClient, OpenWeatherClient, OpenWeatherSummaryClient,
    UpstreamHttp, WeatherFetcher,
};
use crate::services::cache_store::CacheClient;
use crate::services::source_selector::choose_source;

/// Decimal places kept from coordinates when building cache keys
pub const KEY_COORD_DECIMALS: usize = 4;

/// How long a record from `source` stays fresh
pub fn cache_ttl(source: WeatherSource) -> Duration {
    match source {
        WeatherSource::OpenWeather | WeatherSource::AccuWeather => Duration::hours(3),
        WeatherSource::OpenWeather18m | WeatherSource::ClimateNormals => Duration::hours(24),
    }
}

/// Cache key for a lookup, e.g. `weather:2025-01-01:48.8500:2.3500`
pub fn cache_key(date: NaiveDate, latitude: f64, longitude: f64) -> String {
    let (lat, lon) = GpsCoordinates::new(latitude, longitude).to_fixed(KEY_COORD_DECIMALS);
    format!("weather:{}:{}:{}", date.format("%Y-%m-%d"), lat, lon)
}

/// One fetcher per source
#[derive(Clone)]
pub struct SourceFetchers {
    pub openweather: Arc<dyn WeatherFetcher>,
    pub accuweather: Arc<dyn WeatherFetcher>,
    pub openweather18m: Arc<dyn WeatherFetcher>,
    pub climate_normals: Arc<dyn WeatherFetcher>,
}

impl SourceFetchers {
    /// Build the HTTP-backed fetchers from configuration
    pub fn from_config(config: &WeatherConfig, http: UpstreamHttp, clock: Arc<dyn Clock>) -> Self {
        Self {
            openweather: Arc::new(OpenWeatherClient::new(
                http.clone(),
                config.openweather_api_key.clone(),
                config.openweather_base_url.clone(),
                clock,
            )),
            accuweather: Arc::new(AccuWeatherClient::new(
                http.clone(),
                config.accuweather_api_key.clone(),
                config.accuweather_base_url.clone(),
            )),
            openweather18m: Arc::new(OpenWeatherSummaryClient::new(
                http.clone(),
                config.openweather_api_key.clone(),
                config.openweather_base_url.clone(),
            )),
            climate_normals: Arc::new(ClimateNormalsClient::new(
                http,
                config.visual_crossing_api_key.clone(),
                config.visual_crossing_base_url.clone(),
            )),
        }
    }

    pub fn for_source(&self, source: WeatherSource) -> &Arc<dyn WeatherFetcher> {
        match source {
            WeatherSource::OpenWeather => &self.openweather,
            WeatherSource::AccuWeather => &self.accuweather,
            WeatherSource::OpenWeather18m => &self.openweather18m,
            WeatherSource::ClimateNormals => &self.climate_normals,
        }
    }
}

/// Cache layer in front of the source fetchers
#[derive(Clone)]
pub struct WeatherCache {
    store: CacheClient,
    fetchers: SourceFetchers,
    clock: Arc<dyn Clock>,
}

impl WeatherCache {
    pub fn new(store: CacheClient, fetchers: SourceFetchers, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            fetchers,
            clock,
        }
    }

    pub fn store(&self) -> &CacheClient {
        &self.store
    }

    /// Evict expired entries from the store, if there is one
    pub fn purge_expired(&self) -> usize {
        match &self.store {
            CacheClient::Available(store) => store.purge_expired(),
            CacheClient::Unavailable => 0,
        }
    }

    /// Cached record for the key, or a fresh fetch from the selected source
    pub async fn get_or_fetch(
        &self,
        latitude: f64,
        longitude: f64,
        date: NaiveDate,
    ) -> Option<WeatherRecord> {
        let key = cache_key(date, latitude, longitude);

        if let Some(record) = self.read(&key).await {
            tracing::debug!(%key, "Weather cache hit");
            return Some(record);
        }

        let source = match choose_source(self.clock.today(), date) {
            Some(source) => source,
            None => {
                tracing::debug!(%date, "Date is in the past, skipping fetch");
                return None;
            }
        };

        tracing::debug!(%key, %source, "Weather cache miss");
        let record = self
            .fetchers
            .for_source(source)
            .fetch(latitude, longitude, date)
            .await?;

        self.write(&key, &record).await;
        Some(record)
    }

    async fn read(&self, key: &str) -> Option<WeatherRecord> {
        let CacheClient::Available(store) = &self.store else {
            return None;
        };

        match store.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(%key, "Discarding undecodable cache entry: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(%key, "Cache read failed, treating as miss: {}", e);
                None
            }
        }
    }

    async fn write(&self, key: &str, record: &WeatherRecord) {
        let CacheClient::Available(store) = &self.store else {
            return;
        };

        let raw = match serde_json::to_string(record) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(%key, "Could not serialize weather record: {}", e);
                return;
            }
        };

        if let Err(e) = store.set(key, raw, cache_ttl(record.source)).await {
            tracing::warn!(%key, "Cache write failed: {}", e);
        }
    }
}
