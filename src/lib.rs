// Library exports for testing and reusability

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use error::{AppError, Result};

use db::EventStore;
use services::location_service::LocationService;
use services::recommendation::RecommendationEngine;
use std::sync::Arc;

// App state for sharing across the application
pub struct AppState {
    pub location: Arc<LocationService>,
    pub engine: RecommendationEngine,
    pub events: Arc<dyn EventStore>,
    /// Buffer applied when a recommendation request omits `buffer_min`
    pub default_buffer_minutes: i64,
}
