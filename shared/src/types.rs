//! Common types used across the platform

use serde::{Deserialize, Serialize};
use validator::Validate;

/// GPS coordinates in decimal degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Validate)]
pub struct GpsCoordinates {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl GpsCoordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both components rendered with a fixed number of decimals, e.g. for cache keys
    pub fn to_fixed(&self, decimals: usize) -> (String, String) {
        (
            format!("{:.*}", decimals, self.latitude),
            format!("{:.*}", decimals, self.longitude),
        )
    }
}
