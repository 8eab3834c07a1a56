//! Picks the upstream source for a target date from its forecast horizon

use chrono::NaiveDate;
use shared::WeatherSource;

/// Last horizon day served by the near-term forecast
pub const NEAR_TERM_MAX_DAYS: i64 = 10;
/// Last horizon day served by the 45-day extended forecast
pub const EXTENDED_MAX_DAYS: i64 = 45;
/// Last horizon day served by the ~18 month day summary
pub const LONG_RANGE_MAX_DAYS: i64 = 548;

/// Whole calendar days from `today` to `target`
pub fn horizon_days(today: NaiveDate, target: NaiveDate) -> i64 {
    (target - today).num_days()
}

/// Source for `target` as seen from `today`; `None` for past dates
pub fn choose_source(today: NaiveDate, target: NaiveDate) -> Option<WeatherSource> {
    match horizon_days(today, target) {
        d if d < 0 => None,
        0..=NEAR_TERM_MAX_DAYS => Some(WeatherSource::OpenWeather),
        d if d <= EXTENDED_MAX_DAYS => Some(WeatherSource::AccuWeather),
        d if d <= LONG_RANGE_MAX_DAYS => Some(WeatherSource::OpenWeather18m),
        _ => Some(WeatherSource::ClimateNormals),
    }
}
