//! Long-range day summaries from the OpenWeather One Call API

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use shared::{WeatherRecord, WeatherSource};

use crate::error::FetchError;
use crate::external::http::{join_url, UpstreamHttp};
use crate::external::icons::summary_icon;
use crate::external::{absorb, WeatherFetcher};

const DAY_SUMMARY_PATH: &str = "data/3.0/onecall/day_summary";

/// OpenWeather day summary client, used for dates 46-548 days ahead
#[derive(Clone)]
pub struct OpenWeatherSummaryClient {
    http: UpstreamHttp,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct OWMDaySummary {
    temperature: Option<OWMSummaryTemperature>,
    precipitation: Option<OWMSummaryPrecipitation>,
    cloud_cover: Option<OWMSummaryCloudCover>,
}

#[derive(Debug, Deserialize)]
struct OWMSummaryTemperature {
    min: Option<f64>,
    max: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OWMSummaryPrecipitation {
    total: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OWMSummaryCloudCover {
    afternoon: Option<f64>,
}

impl OpenWeatherSummaryClient {
    pub fn new(http: UpstreamHttp, api_key: Option<String>, base_url: String) -> Self {
        Self {
            http,
            api_key,
            base_url,
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
            .ok_or(FetchError::MissingApiKey("openweather18m"))?;

        let url = join_url(&self.base_url, DAY_SUMMARY_PATH);
        let query = [
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("date", date.format("%Y-%m-%d").to_string()),
            ("units", "metric".to_string()),
            ("appid", api_key.to_string()),
        ];
        let summary: OWMDaySummary = self.http.get_json(&url, &query).await?;

        convert_summary(date, summary)
    }
}

fn convert_summary(date: NaiveDate, summary: OWMDaySummary) -> Result<WeatherRecord, FetchError> {
    let temperature = summary
        .temperature
        .ok_or(FetchError::IncompleteData("temperature"))?;
    let max = temperature
        .max
        .ok_or(FetchError::IncompleteData("temperature.max"))?;
    let min = temperature
        .min
        .ok_or(FetchError::IncompleteData("temperature.min"))?;
    let precip = summary.precipitation.and_then(|p| p.total).unwrap_or(0.0);
    let cloud_cover = summary.cloud_cover.and_then(|c| c.afternoon).unwrap_or(0.0);

    WeatherRecord::new(
        date,
        WeatherSource::OpenWeather18m,
        max,
        min,
        precip,
        summary_icon(precip, cloud_cover),
    )
    .ok_or(FetchError::IncompleteData("finite temperatures"))
}

#[async_trait]
impl WeatherFetcher for OpenWeatherSummaryClient {
    fn source(&self) -> WeatherSource {
        WeatherSource::OpenWeather18m
    }

    async fn fetch(&self, latitude: f64, longitude: f64, date: NaiveDate) -> Option<WeatherRecord> {
        absorb(
            self.source(),
            date,
            self.try_fetch(latitude, longitude, date).await,
        )
    }
}
