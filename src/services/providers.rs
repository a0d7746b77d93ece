//! Capability seams for location lookups.
//!
//! Providers are blocking: network implementations hold the calling thread
//! for at most their configured timeout. Async callers should go through
//! `tokio::task::spawn_blocking`.

use crate::error::Result;
use crate::models::GeoPoint;

pub trait GeocodingProvider: Send + Sync {
    /// Resolve a free-text address to its best-match coordinate.
    fn geocode(&self, address: &str) -> Result<GeoPoint>;

    /// Autocomplete labels for a partial address. Providers without an
    /// autocomplete capability return nothing.
    fn suggest_addresses(&self, _query: &str, _limit: usize) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

pub trait RoutingProvider: Send + Sync {
    /// Travel time in minutes from `origin` to `destination`.
    fn estimate_travel_minutes(&self, origin: GeoPoint, destination: GeoPoint) -> Result<f64>;

    /// Short identifier for logs and the health endpoint.
    fn name(&self) -> &'static str;
}

/// Round to one decimal place after applying the minimum-trip floor.
pub(crate) fn floor_and_round_minutes(minutes: f64) -> f64 {
    (minutes.max(crate::constants::MIN_TRAVEL_MINUTES) * 10.0).round() / 10.0
}
