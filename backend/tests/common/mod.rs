//! Test doubles shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use shared::{WeatherIcon, WeatherRecord, WeatherSource};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tripcast_backend::clock::ManualClock;
use tripcast_backend::config::{
    CacheConfig, Config, RetryConfig, ServerConfig, WeatherConfig,
};
use tripcast_backend::error::CacheError;
use tripcast_backend::external::WeatherFetcher;
use tripcast_backend::services::{
    CacheClient, KeyValueStore, MemoryStore, SourceFetchers, WeatherCache, WeatherService,
};
use tripcast_backend::AppState;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Fetcher that fabricates records and counts calls
pub struct StubFetcher {
    source: WeatherSource,
    calls: AtomicUsize,
    failing: Mutex<HashSet<NaiveDate>>,
    fixed: Option<WeatherRecord>,
    delay: Option<std::time::Duration>,
}

impl StubFetcher {
    pub fn new(source: WeatherSource) -> Arc<Self> {
        Arc::new(Self {
            source,
            calls: AtomicUsize::new(0),
            failing: Mutex::new(HashSet::new()),
            fixed: None,
            delay: None,
        })
    }

    /// Fetcher that sleeps for `delay` before answering
    pub fn slow(source: WeatherSource, delay: std::time::Duration) -> Arc<Self> {
        Arc::new(Self {
            source,
            calls: AtomicUsize::new(0),
            failing: Mutex::new(HashSet::new()),
            fixed: None,
            delay: Some(delay),
        })
    }

    pub fn returning(record: WeatherRecord) -> Arc<Self> {
        Arc::new(Self {
            source: record.source,
            calls: AtomicUsize::new(0),
            failing: Mutex::new(HashSet::new()),
            fixed: Some(record),
            delay: None,
        })
    }

    pub fn fail_on(&self, date: NaiveDate) {
        self.failing.lock().unwrap().insert(date);
    }

    pub fn recover(&self, date: NaiveDate) {
        self.failing.lock().unwrap().remove(&date);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherFetcher for StubFetcher {
    fn source(&self) -> WeatherSource {
        self.source
    }

    async fn fetch(&self, _latitude: f64, _longitude: f64, date: NaiveDate) -> Option<WeatherRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().unwrap().contains(&date) {
            return None;
        }
        match &self.fixed {
            Some(record) => Some(record.clone()),
            None => WeatherRecord::new(date, self.source, 21.5, 12.0, 0.8, WeatherIcon::PartlyCloudy),
        }
    }
}

/// Store whose every operation fails
pub struct BrokenStore;

#[async_trait]
impl KeyValueStore for BrokenStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Unreachable("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Unreachable("connection refused".to_string()))
    }
}

/// Cache layer wired to stub fetchers and a manual clock
pub struct Harness {
    pub clock: Arc<ManualClock>,
    pub openweather: Arc<StubFetcher>,
    pub accuweather: Arc<StubFetcher>,
    pub openweather18m: Arc<StubFetcher>,
    pub climate_normals: Arc<StubFetcher>,
    pub cache: WeatherCache,
}

pub enum StoreKind {
    Memory,
    Unavailable,
    Broken,
}

impl Harness {
    pub fn new(today: NaiveDate) -> Self {
        Self::build(today, StoreKind::Memory, StubFetcher::new(WeatherSource::OpenWeather))
    }

    pub fn with_store(today: NaiveDate, kind: StoreKind) -> Self {
        Self::build(today, kind, StubFetcher::new(WeatherSource::OpenWeather))
    }

    pub fn with_openweather(today: NaiveDate, openweather: Arc<StubFetcher>) -> Self {
        Self::build(today, StoreKind::Memory, openweather)
    }

    fn build(today: NaiveDate, kind: StoreKind, openweather: Arc<StubFetcher>) -> Self {
        let clock = Arc::new(ManualClock::new(today));
        let accuweather = StubFetcher::new(WeatherSource::AccuWeather);
        let openweather18m = StubFetcher::new(WeatherSource::OpenWeather18m);
        let climate_normals = StubFetcher::new(WeatherSource::ClimateNormals);

        let fetchers = SourceFetchers {
            openweather: openweather.clone(),
            accuweather: accuweather.clone(),
            openweather18m: openweather18m.clone(),
            climate_normals: climate_normals.clone(),
        };

        let store = match kind {
            StoreKind::Memory => CacheClient::Available(Arc::new(MemoryStore::new(clock.clone()))),
            StoreKind::Unavailable => CacheClient::Unavailable,
            StoreKind::Broken => CacheClient::Available(Arc::new(BrokenStore)),
        };

        let cache = WeatherCache::new(store, fetchers, clock.clone());

        Self {
            clock,
            openweather,
            accuweather,
            openweather18m,
            climate_normals,
            cache,
        }
    }

    pub fn total_calls(&self) -> usize {
        self.openweather.calls()
            + self.accuweather.calls()
            + self.openweather18m.calls()
            + self.climate_normals.calls()
    }

    pub fn service(&self) -> WeatherService {
        WeatherService::new(self.cache.clone(), test_config().weather.max_days_per_request)
    }

    pub fn app_state(&self) -> AppState {
        AppState {
            config: Arc::new(test_config()),
            weather: self.service(),
        }
    }
}

pub fn test_config() -> Config {
    Config {
        environment: "test".to_string(),
        server: ServerConfig::default(),
        cache: CacheConfig { enabled: true },
        weather: WeatherConfig {
            openweather_api_key: Some("ow-key".to_string()),
            openweather_base_url: "http://127.0.0.1:9".to_string(),
            accuweather_api_key: None,
            accuweather_base_url: "http://127.0.0.1:9".to_string(),
            visual_crossing_api_key: Some("vc-key".to_string()),
            visual_crossing_base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 5,
            max_days_per_request: 10,
        },
        retry: RetryConfig::default(),
    }
}
