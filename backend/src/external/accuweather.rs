//! Extended 45-day forecasts from AccuWeather

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Deserialize;
use shared::{WeatherRecord, WeatherSource};

use crate::error::FetchError;
use crate::external::http::{join_url, UpstreamHttp};
use crate::external::icons::{accuweather_icon, precip_from_probability};
use crate::external::{absorb, WeatherFetcher};

const GEOPOSITION_PATH: &str = "locations/v1/cities/geoposition/search";
const DAILY_45_PATH: &str = "forecasts/v1/daily/45day";

/// AccuWeather client, used for dates 11-45 days ahead
#[derive(Clone)]
pub struct AccuWeatherClient {
    http: UpstreamHttp,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct AccuLocation {
    #[serde(rename = "Key")]
    key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AccuDailyResponse {
    #[serde(rename = "DailyForecasts", default)]
    daily_forecasts: Vec<AccuDailyForecast>,
}

#[derive(Debug, Deserialize)]
struct AccuDailyForecast {
    #[serde(rename = "Date")]
    date: DateTime<FixedOffset>,
    #[serde(rename = "Temperature")]
    temperature: Option<AccuTemperature>,
    #[serde(rename = "Day")]
    day: Option<AccuDayPart>,
}

#[derive(Debug, Deserialize)]
struct AccuTemperature {
    #[serde(rename = "Minimum")]
    minimum: Option<AccuValue>,
    #[serde(rename = "Maximum")]
    maximum: Option<AccuValue>,
}

#[derive(Debug, Deserialize)]
struct AccuValue {
    #[serde(rename = "Value")]
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct AccuDayPart {
    #[serde(rename = "Icon")]
    icon: Option<u8>,
    #[serde(rename = "RainProbability")]
    rain_probability: Option<f64>,
}

impl AccuWeatherClient {
    pub fn new(http: UpstreamHttp, api_key: Option<String>, base_url: String) -> Self {
        Self {
            http,
            api_key,
            base_url,
        }
    }

    /// Resolve coordinates to an AccuWeather location key
    async fn location_key(
        &self,
        api_key: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<String, FetchError> {
        let url = join_url(&self.base_url, GEOPOSITION_PATH);
        let query = [
            ("apikey", api_key.to_string()),
            ("q", format!("{},{}", latitude, longitude)),
        ];
        let location: Option<AccuLocation> = self.http.get_json(&url, &query).await?;

        location
            .and_then(|l| l.key)
            .filter(|key| !key.is_empty())
            .ok_or(FetchError::LocationNotFound {
                latitude,
                longitude,
            })
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
            .ok_or(FetchError::MissingApiKey("accuweather"))?;

        let key = self.location_key(api_key, latitude, longitude).await?;

        let url = join_url(&self.base_url, &format!("{}/{}", DAILY_45_PATH, key));
        let query = [
            ("apikey", api_key.to_string()),
            ("metric", "true".to_string()),
            ("details", "true".to_string()),
        ];
        let data: AccuDailyResponse = self.http.get_json(&url, &query).await?;

        let forecast = data
            .daily_forecasts
            .into_iter()
            .find(|f| f.date.date_naive() == date)
            .ok_or(FetchError::DateNotFound(date))?;

        convert_forecast(date, forecast)
    }
}

fn convert_forecast(
    date: NaiveDate,
    forecast: AccuDailyForecast,
) -> Result<WeatherRecord, FetchError> {
    let temperature = forecast
        .temperature
        .ok_or(FetchError::IncompleteData("Temperature"))?;
    let max = temperature
        .maximum
        .and_then(|v| v.value)
        .ok_or(FetchError::IncompleteData("Temperature.Maximum"))?;
    let min = temperature
        .minimum
        .and_then(|v| v.value)
        .ok_or(FetchError::IncompleteData("Temperature.Minimum"))?;
    let day = forecast.day.ok_or(FetchError::IncompleteData("Day"))?;
    let rain_probability = day
        .rain_probability
        .ok_or(FetchError::IncompleteData("Day.RainProbability"))?;
    let icon = day.icon.map(accuweather_icon).unwrap_or(shared::WeatherIcon::Clear);

    WeatherRecord::new(
        date,
        WeatherSource::AccuWeather,
        max,
        min,
        precip_from_probability(rain_probability),
        icon,
    )
    .ok_or(FetchError::IncompleteData("finite temperatures"))
}

#[async_trait]
impl WeatherFetcher for AccuWeatherClient {
    fn source(&self) -> WeatherSource {
        WeatherSource::AccuWeather
    }

    async fn fetch(&self, latitude: f64, longitude: f64, date: NaiveDate) -> Option<WeatherRecord> {
        absorb(
            self.source(),
            date,
            self.try_fetch(latitude, longitude, date).await,
        )
    }
}
