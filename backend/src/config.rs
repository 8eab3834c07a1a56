//! Configuration management for the Tripcast weather service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with TRIPCAST__ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Cache store configuration
    pub cache: CacheConfig,

    /// Upstream weather provider configuration
    pub weather: WeatherConfig,

    /// Retry policy for upstream calls
    pub retry: RetryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// When false the service runs without a cache store
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// OpenWeather API key (near-term forecasts and day summaries)
    pub openweather_api_key: Option<String>,

    /// OpenWeather API base URL
    pub openweather_base_url: String,

    /// AccuWeather API key (45-day forecasts)
    pub accuweather_api_key: Option<String>,

    /// AccuWeather API base URL
    pub accuweather_base_url: String,

    /// Visual Crossing API key (climate normals)
    pub visual_crossing_api_key: Option<String>,

    /// Visual Crossing API base URL
    pub visual_crossing_base_url: String,

    /// Per-request timeout for upstream calls
    pub request_timeout_secs: u64,

    /// Upper bound on days in one batch request
    pub max_days_per_request: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Delay before the first retry; doubles for each further retry
    pub base_delay_ms: u64,
}

impl WeatherConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("TRIPCAST_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = Self::defaults(config::Config::builder(), &environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (TRIPCAST__ prefix)
            .add_source(
                Environment::with_prefix("TRIPCAST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    fn defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        environment: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            .set_default("environment", environment)?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("cache.enabled", true)?
            .set_default("weather.openweather_base_url", "https://api.openweathermap.org")?
            .set_default("weather.accuweather_base_url", "https://dataservice.accuweather.com")?
            .set_default(
                "weather.visual_crossing_base_url",
                "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services",
            )?
            .set_default("weather.request_timeout_secs", 10)?
            .set_default("weather.max_days_per_request", 366)?
            .set_default("retry.max_attempts", 3)?
            .set_default("retry.base_delay_ms", 1000)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
        }
    }
}
