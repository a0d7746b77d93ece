use crate::constants::{AVERAGE_CITY_SPEED_KMH, TRAFFIC_MULTIPLIER};
use crate::error::Result;
use crate::models::GeoPoint;
use crate::services::providers::{floor_and_round_minutes, RoutingProvider};

/// Analytic travel-time estimate from great-circle distance.
/// No I/O, deterministic, never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineRoutingProvider;

impl HaversineRoutingProvider {
    pub fn new() -> Self {
        HaversineRoutingProvider
    }

    pub fn minutes_between(&self, origin: GeoPoint, destination: GeoPoint) -> f64 {
        let distance_km = origin.distance_km(&destination);
        let minutes = distance_km / AVERAGE_CITY_SPEED_KMH * 60.0 * TRAFFIC_MULTIPLIER;
        floor_and_round_minutes(minutes)
    }
}

impl RoutingProvider for HaversineRoutingProvider {
    fn estimate_travel_minutes(&self, origin: GeoPoint, destination: GeoPoint) -> Result<f64> {
        Ok(self.minutes_between(origin, destination))
    }

    fn name(&self) -> &'static str {
        "haversine"
    }
}
