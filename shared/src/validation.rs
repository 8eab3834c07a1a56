//! Validation utilities for itinerary day descriptors

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use validator::Validate;

use crate::models::DayRequest;
use crate::types::GpsCoordinates;

/// Reasons a day descriptor cannot be looked up
#[derive(Debug, Error, PartialEq)]
pub enum DayValidationError {
    #[error("malformed day entry: {0}")]
    Malformed(String),

    #[error("date '{0}' is not a YYYY-MM-DD calendar date")]
    InvalidDate(String),

    #[error("day has no coordinates")]
    MissingCoordinates,

    #[error("coordinates ({latitude}, {longitude}) are out of range")]
    CoordinatesOutOfRange { latitude: f64, longitude: f64 },
}

/// Decode one raw element of a request's `days` array
pub fn decode_day(raw: &Value) -> Result<DayRequest, DayValidationError> {
    DayRequest::deserialize(raw).map_err(|e| DayValidationError::Malformed(e.to_string()))
}

/// The `date` string of a raw day element, if it has one
pub fn raw_date(raw: &Value) -> Option<&str> {
    raw.get("date").and_then(Value::as_str)
}

/// Parse a strict `YYYY-MM-DD` date
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, DayValidationError> {
    if value.len() != 10 {
        return Err(DayValidationError::InvalidDate(value.to_string()));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| DayValidationError::InvalidDate(value.to_string()))
}

/// Validate latitude/longitude ranges
pub fn validate_coordinates(coords: &GpsCoordinates) -> Result<(), DayValidationError> {
    coords
        .validate()
        .map_err(|_| DayValidationError::CoordinatesOutOfRange {
            latitude: coords.latitude,
            longitude: coords.longitude,
        })
}

/// Resolve a day descriptor into a lookup target
pub fn validate_day(day: &DayRequest) -> Result<(NaiveDate, GpsCoordinates), DayValidationError> {
    let coords = day
        .coordinates()
        .ok_or(DayValidationError::MissingCoordinates)?;
    validate_coordinates(&coords)?;
    let date = parse_iso_date(&day.date)?;
    Ok((date, coords))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(date: &str, latitude: Option<f64>, longitude: Option<f64>) -> DayRequest {
        DayRequest {
            day_id: "d1".to_string(),
            date: date.to_string(),
            latitude,
            longitude,
        }
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_iso_date("2025-01-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
        assert!(parse_iso_date("2025-1-1").is_err());
        assert!(parse_iso_date("2025-02-30").is_err());
        assert!(parse_iso_date("01/01/2025").is_err());
        assert!(parse_iso_date("").is_err());
    }

    #[test]
    fn test_coordinate_ranges() {
        assert!(validate_coordinates(&GpsCoordinates::new(48.85, 2.35)).is_ok());
        assert!(validate_coordinates(&GpsCoordinates::new(-90.0, 180.0)).is_ok());
        assert!(validate_coordinates(&GpsCoordinates::new(90.5, 0.0)).is_err());
        assert!(validate_coordinates(&GpsCoordinates::new(0.0, -181.0)).is_err());
    }

    #[test]
    fn test_decode_day_tolerates_missing_day_id() {
        let day = decode_day(&json!({ "date": "2025-01-02", "latitude": 48.85, "longitude": 2.35 }))
            .unwrap();
        assert_eq!(day.day_id, "");
        assert_eq!(day.coordinates(), Some(GpsCoordinates::new(48.85, 2.35)));
    }

    #[test]
    fn test_decode_day_rejects_wrong_types() {
        let raw = json!({ "day_id": "d2", "date": "2025-01-02", "latitude": "48.85", "longitude": 2.35 });
        assert!(matches!(decode_day(&raw), Err(DayValidationError::Malformed(_))));
        assert_eq!(raw_date(&raw), Some("2025-01-02"));

        assert!(matches!(decode_day(&json!(42)), Err(DayValidationError::Malformed(_))));
        assert_eq!(raw_date(&json!(42)), None);
        assert_eq!(raw_date(&json!({ "date": 20250102 })), None);
    }

    #[test]
    fn test_validate_day() {
        assert_eq!(
            validate_day(&day("2025-01-01", None, Some(2.35))),
            Err(DayValidationError::MissingCoordinates)
        );
        assert!(matches!(
            validate_day(&day("tomorrow", Some(48.85), Some(2.35))),
            Err(DayValidationError::InvalidDate(_))
        ));
        let (date, coords) = validate_day(&day("2025-01-01", Some(48.85), Some(2.35))).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(coords.latitude, 48.85);
    }
}
