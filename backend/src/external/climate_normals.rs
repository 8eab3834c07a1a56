//! 30-year climate normals from the Visual Crossing statistical timeline

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use shared::{WeatherRecord, WeatherSource};

use crate::error::FetchError;
use crate::external::http::{join_url, UpstreamHttp};
use crate::external::icons::{normals_icon, precip_from_probability};
use crate::external::{absorb, WeatherFetcher};

const TIMELINE_PATH: &str = "timeline";
const ELEMENTS: &str = "datetime,tempmax,tempmin,precipprob,cloudcover";

/// Climate normals client, used beyond the 548-day horizon
#[derive(Clone)]
pub struct ClimateNormalsClient {
    http: UpstreamHttp,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct VCTimelineResponse {
    #[serde(default)]
    days: Vec<VCDay>,
}

#[derive(Debug, Deserialize)]
struct VCDay {
    datetime: NaiveDate,
    tempmax: Option<f64>,
    tempmin: Option<f64>,
    precipprob: Option<f64>,
    cloudcover: Option<f64>,
}

impl ClimateNormalsClient {
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
            .ok_or(FetchError::MissingApiKey("climateNormals"))?;

        let url = join_url(
            &self.base_url,
            &format!("{}/{},{}", TIMELINE_PATH, latitude, longitude),
        );
        let query = [
            ("unitGroup", "metric".to_string()),
            ("include", "days".to_string()),
            ("options", "stats".to_string()),
            ("elements", ELEMENTS.to_string()),
            ("key", api_key.to_string()),
        ];
        let timeline: VCTimelineResponse = self.http.get_json(&url, &query).await?;

        let day = find_same_day_of_year(timeline.days, date).ok_or(FetchError::DateNotFound(date))?;

        convert_day(date, day)
    }
}

/// Normals are year-independent; match on month and day only
fn find_same_day_of_year(days: Vec<VCDay>, date: NaiveDate) -> Option<VCDay> {
    days.into_iter()
        .find(|d| d.datetime.month() == date.month() && d.datetime.day() == date.day())
}

fn convert_day(date: NaiveDate, day: VCDay) -> Result<WeatherRecord, FetchError> {
    let max = day.tempmax.ok_or(FetchError::IncompleteData("tempmax"))?;
    let min = day.tempmin.ok_or(FetchError::IncompleteData("tempmin"))?;
    let precip_prob = day
        .precipprob
        .ok_or(FetchError::IncompleteData("precipprob"))?;
    let cloud_cover = day.cloudcover.unwrap_or(0.0);

    WeatherRecord::new(
        date,
        WeatherSource::ClimateNormals,
        max,
        min,
        precip_from_probability(precip_prob),
        normals_icon(precip_prob, cloud_cover, min),
    )
    .ok_or(FetchError::IncompleteData("finite temperatures"))
}

#[async_trait]
impl WeatherFetcher for ClimateNormalsClient {
    fn source(&self) -> WeatherSource {
        WeatherSource::ClimateNormals
    }

    async fn fetch(&self, latitude: f64, longitude: f64, date: NaiveDate) -> Option<WeatherRecord> {
        absorb(
            self.source(),
            date,
            self.try_fetch(latitude, longitude, date).await,
        )
    }
}
