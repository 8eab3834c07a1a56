//! Request and response shapes for the weather batch endpoint

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::WeatherRecord;
use crate::types::GpsCoordinates;

/// One itinerary day to look up
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayRequest {
    #[serde(default)]
    pub day_id: String,
    /// Calendar date as `YYYY-MM-DD`
    pub date: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl DayRequest {
    /// Coordinates for the day, present only when both components are set
    pub fn coordinates(&self) -> Option<GpsCoordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(GpsCoordinates::new(latitude, longitude)),
            _ => None,
        }
    }
}

/// Body of `POST /api/v1/weather`
///
/// Elements of `days` stay raw JSON here and are decoded one at a time, so a
/// malformed day only nulls itself out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherRequest {
    pub days: Vec<serde_json::Value>,
}

/// Weather keyed by the requested date string; `None` serializes as `null`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct WeatherResponse(pub BTreeMap<String, Option<WeatherRecord>>);

impl FromIterator<(String, Option<WeatherRecord>)> for WeatherResponse {
    fn from_iter<I: IntoIterator<Item = (String, Option<WeatherRecord>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
