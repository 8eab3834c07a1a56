//! Batch weather lookups for itinerary days

use futures_util::future::join_all;
use serde_json::Value;
use shared::{decode_day, raw_date, validate_day, DayValidationError, WeatherRecord, WeatherResponse};
use std::collections::BTreeMap;

use crate::error::{AppError, AppResult};
use crate::services::weather_cache::WeatherCache;

/// Weather service fanning day lookups out to the cache layer
#[derive(Clone)]
pub struct WeatherService {
    cache: WeatherCache,
    max_days_per_request: usize,
}

impl WeatherService {
    /// Create a new WeatherService instance
    pub fn new(cache: WeatherCache, max_days_per_request: usize) -> Self {
        Self {
            cache,
            max_days_per_request,
        }
    }

    pub fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    /// Look up weather for every day concurrently.
    ///
    /// Days without usable coordinates or dates come back as `None`; no single
    /// day can fail the batch. Elements without a `date` string have no key to
    /// report under and are left out.
    pub async fn lookup_days(&self, days: Vec<Value>) -> AppResult<WeatherResponse> {
        if days.len() > self.max_days_per_request {
            return Err(AppError::BadRequest(format!(
                "At most {} days may be requested at once, got {}",
                self.max_days_per_request,
                days.len()
            )));
        }

        let lookups = days.into_iter().map(|day| self.lookup_day(day));
        let results = join_all(lookups).await;

        let mut merged: BTreeMap<String, Option<WeatherRecord>> = BTreeMap::new();
        for (date, record) in results.into_iter().flatten() {
            // A duplicated date keeps whichever lookup produced data
            let slot = merged.entry(date).or_insert(None);
            if slot.is_none() {
                *slot = record;
            }
        }

        Ok(WeatherResponse(merged))
    }

    async fn lookup_day(&self, raw: Value) -> Option<(String, Option<WeatherRecord>)> {
        let day = match decode_day(&raw) {
            Ok(day) => day,
            Err(e) => {
                let Some(date) = raw_date(&raw) else {
                    tracing::warn!("Dropping day entry without a date: {}", e);
                    return None;
                };
                tracing::warn!(%date, "Skipping weather for day: {}", e);
                return Some((date.to_string(), None));
            }
        };

        match validate_day(&day) {
            Ok((date, coords)) => {
                let record = self
                    .cache
                    .get_or_fetch(coords.latitude, coords.longitude, date)
                    .await;
                Some((day.date, record))
            }
            Err(DayValidationError::MissingCoordinates) => {
                tracing::debug!(day_id = %day.day_id, "Day has no coordinates, skipping weather");
                Some((day.date, None))
            }
            Err(e) => {
                tracing::warn!(day_id = %day.day_id, "Skipping weather for day: {}", e);
                Some((day.date, None))
            }
        }
    }
}
