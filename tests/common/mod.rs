use std::collections::HashMap;
use std::sync::Arc;
use whatsmyway::config::EngineConfig;
use whatsmyway::db::{EventStore, InMemoryEventStore};
use whatsmyway::models::GeoPoint;
use whatsmyway::services::haversine::HaversineRoutingProvider;
use whatsmyway::services::location_service::LocationService;
use whatsmyway::services::providers::{GeocodingProvider, RoutingProvider};
use whatsmyway::services::recommendation::RecommendationEngine;
use whatsmyway::{AppError, AppState, Result};

/// Geocoder backed by a fixed address table
pub struct TableGeocoder {
    points: HashMap<String, GeoPoint>,
}

impl TableGeocoder {
    #[allow(dead_code)]
    pub fn paris() -> Self {
        let points = [
            ("10 rue de Rivoli, Paris", GeoPoint { lat: 48.8556, lng: 2.3600 }),
            ("1 place du Louvre, Paris", GeoPoint { lat: 48.8606, lng: 2.3376 }),
            ("5 avenue Anatole France, Paris", GeoPoint { lat: 48.8584, lng: 2.2945 }),
            ("Place de la Bastille, Paris", GeoPoint { lat: 48.8532, lng: 2.3691 }),
        ]
        .into_iter()
        .map(|(address, point)| (address.to_string(), point))
        .collect();
        Self { points }
    }
}

impl GeocodingProvider for TableGeocoder {
    fn geocode(&self, address: &str) -> Result<GeoPoint> {
        self.points
            .get(address)
            .copied()
            .ok_or_else(|| AppError::geocoding(format!("No geocoding match for '{}'", address)))
    }

    fn suggest_addresses(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        let query = query.to_lowercase();
        let mut matches: Vec<String> = self
            .points
            .keys()
            .filter(|address| address.to_lowercase().contains(&query))
            .cloned()
            .collect();
        matches.sort();
        matches.truncate(limit);
        Ok(matches)
    }
}

/// Every leg takes the same time
#[allow(dead_code)]
pub struct ConstantRouting(pub f64);

impl RoutingProvider for ConstantRouting {
    fn estimate_travel_minutes(&self, _origin: GeoPoint, _destination: GeoPoint) -> Result<f64> {
        Ok(self.0)
    }

    fn name(&self) -> &'static str {
        "constant"
    }
}

/// Router that fails every call with the error built by `make_error`
#[allow(dead_code)]
pub struct FailingRouting {
    pub make_error: fn() -> AppError,
}

impl RoutingProvider for FailingRouting {
    fn estimate_travel_minutes(&self, _origin: GeoPoint, _destination: GeoPoint) -> Result<f64> {
        Err((self.make_error)())
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

#[allow(dead_code)]
pub fn haversine_location() -> LocationService {
    location_with(Arc::new(HaversineRoutingProvider::new()))
}

#[allow(dead_code)]
pub fn location_with(router: Arc<dyn RoutingProvider>) -> LocationService {
    LocationService::new(Arc::new(TableGeocoder::paris()), router, None, 64)
}

/// Build the app state around `location`, with an empty event store
#[allow(dead_code)]
pub fn test_state(location: LocationService) -> Arc<AppState> {
    let config = EngineConfig::default();
    let events: Arc<dyn EventStore> = Arc::new(InMemoryEventStore::new());
    Arc::new(AppState {
        location: Arc::new(location),
        engine: RecommendationEngine::new(&config).expect("default engine config is valid"),
        events,
        default_buffer_minutes: config.default_buffer_minutes,
    })
}

#[allow(dead_code)]
pub fn test_app(state: Arc<AppState>) -> axum::Router {
    whatsmyway::routes::create_router(state)
}
