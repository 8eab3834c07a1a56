//! Weather data models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream provider a weather record was derived from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WeatherSource {
    /// Daily forecast, 0-10 days ahead
    #[serde(rename = "openweather")]
    OpenWeather,
    /// 45-day extended forecast, 11-45 days ahead
    #[serde(rename = "accuweather")]
    AccuWeather,
    /// Day summary, 46-548 days ahead
    #[serde(rename = "openweather18m")]
    OpenWeather18m,
    /// 30-year climate averages, beyond 548 days
    #[serde(rename = "climateNormals")]
    ClimateNormals,
}

impl WeatherSource {
    pub const ALL: [WeatherSource; 4] = [
        WeatherSource::OpenWeather,
        WeatherSource::AccuWeather,
        WeatherSource::OpenWeather18m,
        WeatherSource::ClimateNormals,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherSource::OpenWeather => "openweather",
            WeatherSource::AccuWeather => "accuweather",
            WeatherSource::OpenWeather18m => "openweather18m",
            WeatherSource::ClimateNormals => "climateNormals",
        }
    }

    /// Reliability of records produced by this source
    pub fn confidence(&self) -> Confidence {
        match self {
            WeatherSource::OpenWeather => Confidence::High,
            WeatherSource::AccuWeather => Confidence::Medium,
            WeatherSource::OpenWeather18m | WeatherSource::ClimateNormals => Confidence::Low,
        }
    }
}

impl fmt::Display for WeatherSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative forecast reliability
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Shared weather glyph vocabulary, serialized as OpenWeather day icon codes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WeatherIcon {
    #[serde(rename = "01d")]
    Clear,
    #[serde(rename = "02d")]
    PartlyCloudy,
    #[serde(rename = "03d")]
    Cloudy,
    #[serde(rename = "04d")]
    Overcast,
    #[serde(rename = "09d")]
    Showers,
    #[serde(rename = "10d")]
    Rain,
    #[serde(rename = "11d")]
    Thunderstorm,
    #[serde(rename = "13d")]
    Snow,
    #[serde(rename = "50d")]
    Fog,
}

impl WeatherIcon {
    pub const ALL: [WeatherIcon; 9] = [
        WeatherIcon::Clear,
        WeatherIcon::PartlyCloudy,
        WeatherIcon::Cloudy,
        WeatherIcon::Overcast,
        WeatherIcon::Showers,
        WeatherIcon::Rain,
        WeatherIcon::Thunderstorm,
        WeatherIcon::Snow,
        WeatherIcon::Fog,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            WeatherIcon::Clear => "01d",
            WeatherIcon::PartlyCloudy => "02d",
            WeatherIcon::Cloudy => "03d",
            WeatherIcon::Overcast => "04d",
            WeatherIcon::Showers => "09d",
            WeatherIcon::Rain => "10d",
            WeatherIcon::Thunderstorm => "11d",
            WeatherIcon::Snow => "13d",
            WeatherIcon::Fog => "50d",
        }
    }

    /// Parse an OpenWeather icon code such as `10n`; day and night variants
    /// collapse to the same glyph.
    pub fn from_openweather_code(code: &str) -> Option<Self> {
        match code.get(..2)? {
            "01" => Some(WeatherIcon::Clear),
            "02" => Some(WeatherIcon::PartlyCloudy),
            "03" => Some(WeatherIcon::Cloudy),
            "04" => Some(WeatherIcon::Overcast),
            "09" => Some(WeatherIcon::Showers),
            "10" => Some(WeatherIcon::Rain),
            "11" => Some(WeatherIcon::Thunderstorm),
            "13" => Some(WeatherIcon::Snow),
            "50" => Some(WeatherIcon::Fog),
            _ => None,
        }
    }
}

impl fmt::Display for WeatherIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Normalized daily weather record produced by every source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherRecord {
    #[serde(rename = "isoDate")]
    pub iso_date: NaiveDate,
    pub source: WeatherSource,
    #[serde(rename = "hiC")]
    pub hi_c: f64,
    #[serde(rename = "loC")]
    pub lo_c: f64,
    #[serde(rename = "precipMM")]
    pub precip_mm: f64,
    pub icon: WeatherIcon,
    pub confidence: Confidence,
}

impl WeatherRecord {
    /// Build a record from raw provider values.
    ///
    /// Temperatures are rounded to one decimal and ordered so that `hi_c >= lo_c`;
    /// precipitation is clamped at zero. Returns `None` for non-finite input.
    pub fn new(
        iso_date: NaiveDate,
        source: WeatherSource,
        hi_c: f64,
        lo_c: f64,
        precip_mm: f64,
        icon: WeatherIcon,
    ) -> Option<Self> {
        if !(hi_c.is_finite() && lo_c.is_finite() && precip_mm.is_finite()) {
            return None;
        }

        let (hi, lo) = if hi_c >= lo_c { (hi_c, lo_c) } else { (lo_c, hi_c) };

        Some(Self {
            iso_date,
            source,
            hi_c: round_one(hi),
            lo_c: round_one(lo),
            precip_mm: round_one(precip_mm.max(0.0)),
            icon,
            confidence: source.confidence(),
        })
    }
}

/// Round to one decimal place
pub fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
