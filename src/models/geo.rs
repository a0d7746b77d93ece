use crate::constants::EARTH_RADIUS_KM;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A WGS84 coordinate. Plain value type, copied freely.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(AppError::InvalidInput(format!(
                "Invalid latitude: {} (must be between -90 and 90)",
                lat
            )));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(AppError::InvalidInput(format!(
                "Invalid longitude: {} (must be between -180 and 180)",
                lng
            )));
        }
        Ok(GeoPoint { lat, lng })
    }

    /// Great-circle distance in kilometers (haversine formula).
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.lat, self.lng)
    }
}
