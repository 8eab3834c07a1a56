//! External weather provider integrations
//!
//! Every fetcher turns one provider's response into a `WeatherRecord`. Failures
//! never cross the `WeatherFetcher` boundary: they are logged and become `None`.

pub mod accuweather;
pub mod climate_normals;
pub mod http;
pub mod icons;
pub mod openweather;
pub mod openweather_summary;
pub mod retry;

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{WeatherRecord, WeatherSource};

use crate::error::FetchError;

pub use accuweather::AccuWeatherClient;
pub use climate_normals::ClimateNormalsClient;
pub use http::UpstreamHttp;
pub use openweather::OpenWeatherClient;
pub use openweather_summary::OpenWeatherSummaryClient;
pub use retry::{with_retry, RetryPolicy, Transient};

/// One upstream weather source
#[async_trait]
pub trait WeatherFetcher: Send + Sync {
    /// Provenance tag stamped on records from this fetcher
    fn source(&self) -> WeatherSource;

    /// Weather for `date` at the given coordinates, or `None` when unavailable
    async fn fetch(&self, latitude: f64, longitude: f64, date: NaiveDate) -> Option<WeatherRecord>;
}

/// Reduce a fetch result to an optional record, logging the failure
pub(crate) fn absorb(
    source: WeatherSource,
    date: NaiveDate,
    result: Result<WeatherRecord, FetchError>,
) -> Option<WeatherRecord> {
    match result {
        Ok(record) => {
            tracing::debug!(%source, %date, "Fetched weather record");
            Some(record)
        }
        Err(e @ (FetchError::DateNotFound(_) | FetchError::MissingApiKey(_))) => {
            tracing::warn!(%source, %date, "No weather data: {}", e);
            None
        }
        Err(e) => {
            tracing::error!(%source, %date, "Weather fetch failed: {}", e);
            None
        }
    }
}
