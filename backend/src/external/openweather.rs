//! Near-term daily forecasts from the OpenWeather One Call API

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use shared::{WeatherIcon, WeatherRecord, WeatherSource};
use std::sync::Arc;

use crate::clock::Clock;
use crate::error::FetchError;
use crate::external::http::{join_url, UpstreamHttp};
use crate::external::{absorb, WeatherFetcher};

const ONE_CALL_PATH: &str = "data/3.0/onecall";

/// OpenWeather One Call client, used for dates 0-10 days ahead
#[derive(Clone)]
pub struct OpenWeatherClient {
    http: UpstreamHttp,
    api_key: Option<String>,
    base_url: String,
    clock: Arc<dyn Clock>,
}

/// One Call response; only the daily block is requested
#[derive(Debug, Deserialize)]
struct OWMOneCallResponse {
    #[serde(default)]
    daily: Vec<OWMDaily>,
}

#[derive(Debug, Deserialize)]
struct OWMDaily {
    temp: Option<OWMDailyTemp>,
    rain: Option<f64>,
    snow: Option<f64>,
    #[serde(default)]
    weather: Vec<OWMWeather>,
}

#[derive(Debug, Deserialize)]
struct OWMDailyTemp {
    min: Option<f64>,
    max: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OWMWeather {
    icon: String,
}

impl OpenWeatherClient {
    pub fn new(
        http: UpstreamHttp,
        api_key: Option<String>,
        base_url: String,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            http,
            api_key,
            base_url,
            clock,
        }
    }

    async fn try_fetch(
        &self,
        latitude: f64,
        longitude: f64,
        date: NaiveDate,
    ) -> Result<WeatherRecord, FetchError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(FetchError::MissingApiKey("openweather"))?;

        let offset = (date - self.clock.today()).num_days();
        if offset < 0 {
            return Err(FetchError::DateNotFound(date));
        }

        let url = join_url(&self.base_url, ONE_CALL_PATH);
        let query = [
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("exclude", "current,minutely,hourly,alerts".to_string()),
            ("units", "metric".to_string()),
            ("appid", api_key.to_string()),
        ];
        let data: OWMOneCallResponse = self.http.get_json(&url, &query).await?;

        let day = data
            .daily
            .into_iter()
            .nth(offset as usize)
            .ok_or(FetchError::DateNotFound(date))?;

        convert_daily(date, day)
    }
}

/// Convert one daily entry; every field except precipitation is required
fn convert_daily(date: NaiveDate, day: OWMDaily) -> Result<WeatherRecord, FetchError> {
    let temp = day.temp.ok_or(FetchError::IncompleteData("temp"))?;
    let max = temp.max.ok_or(FetchError::IncompleteData("temp.max"))?;
    let min = temp.min.ok_or(FetchError::IncompleteData("temp.min"))?;
    let icon = day
        .weather
        .first()
        .and_then(|w| WeatherIcon::from_openweather_code(&w.icon))
        .ok_or(FetchError::IncompleteData("weather icon"))?;
    let precip = day.rain.unwrap_or(0.0) + day.snow.unwrap_or(0.0);

    WeatherRecord::new(date, WeatherSource::OpenWeather, max, min, precip, icon)
        .ok_or(FetchError::IncompleteData("finite temperatures"))
}

#[async_trait]
impl WeatherFetcher for OpenWeatherClient {
    fn source(&self) -> WeatherSource {
        WeatherSource::OpenWeather
    }

    async fn fetch(&self, latitude: f64, longitude: f64, date: NaiveDate) -> Option<WeatherRecord> {
        absorb(
            self.source(),
            date,
            self.try_fetch(latitude, longitude, date).await,
        )
    }
}
