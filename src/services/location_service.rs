use crate::config::LocationConfig;
use crate::constants::MIN_SUGGEST_QUERY_CHARS;
use crate::error::{AppError, Result};
use crate::models::GeoPoint;
use crate::services::geoapify::GeoapifyClient;
use crate::services::haversine::HaversineRoutingProvider;
use crate::services::providers::{GeocodingProvider, RoutingProvider};
use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use serde::Serialize;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Which providers back geocoding and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Geoapify for both geocoding and routing.
    Geoapify,
    /// Geoapify geocoding, analytic haversine routing.
    GeoapifyHaversine,
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "geoapify" => Ok(ProviderKind::Geoapify),
            "geoapify-haversine" => Ok(ProviderKind::GeoapifyHaversine),
            other => Err(AppError::ProviderMisconfigured(format!(
                "Unsupported LOCATION_PROVIDER '{}'. Supported values: geoapify, geoapify-haversine",
                other
            ))),
        }
    }
}

/// Secondary routing estimator used when the primary fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingFallback {
    Off,
    Haversine,
}

impl FromStr for RoutingFallback {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "off" => Ok(RoutingFallback::Off),
            "haversine" => Ok(RoutingFallback::Haversine),
            other => Err(AppError::ProviderMisconfigured(format!(
                "Unsupported ROUTING_FALLBACK '{}'. Supported values: off, haversine",
                other
            ))),
        }
    }
}

/// Geocode cache counters for monitoring.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GeocodeCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub entries: u64,
}

/// Single entry point for address resolution and travel-time estimates.
///
/// Geocodes are memoized in a bounded LRU cache keyed by the normalized
/// address; failed lookups are never cached. Routing goes to the primary
/// provider and, on a routing failure only, to the optional fallback.
pub struct LocationService {
    geocoder: Arc<dyn GeocodingProvider>,
    router: Arc<dyn RoutingProvider>,
    fallback_router: Option<Arc<dyn RoutingProvider>>,
    geocode_cache: Cache<String, GeoPoint>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl LocationService {
    pub fn new(
        geocoder: Arc<dyn GeocodingProvider>,
        router: Arc<dyn RoutingProvider>,
        fallback_router: Option<Arc<dyn RoutingProvider>>,
        cache_capacity: u64,
    ) -> Self {
        let geocode_cache = Cache::builder()
            .max_capacity(cache_capacity)
            .eviction_policy(EvictionPolicy::lru())
            .build();

        LocationService {
            geocoder,
            router,
            fallback_router,
            geocode_cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Build the configured providers. Runs once at startup; configuration
    /// problems surface here as `ProviderMisconfigured`, never per call.
    pub fn from_config(config: &LocationConfig) -> Result<Self> {
        let provider: ProviderKind = config.provider.parse()?;
        let fallback: RoutingFallback = config.routing_fallback.parse()?;

        let geoapify = Arc::new(
            GeoapifyClient::new(
                config.api_key.clone(),
                Duration::from_secs_f64(config.timeout_seconds),
            )?
            .with_base_url(config.base_url.clone())
            .with_mode(config.route_mode.clone()),
        );

        let service = match provider {
            ProviderKind::Geoapify => {
                let fallback_router: Option<Arc<dyn RoutingProvider>> = match fallback {
                    RoutingFallback::Off => None,
                    RoutingFallback::Haversine => Some(Arc::new(HaversineRoutingProvider::new())),
                };
                LocationService::new(
                    geoapify.clone(),
                    geoapify,
                    fallback_router,
                    config.geocode_cache_capacity,
                )
            }
            ProviderKind::GeoapifyHaversine => LocationService::new(
                geoapify,
                Arc::new(HaversineRoutingProvider::new()),
                None,
                config.geocode_cache_capacity,
            ),
        };

        tracing::info!(
            provider = ?provider,
            routing = service.routing_provider_name(),
            fallback = service.has_fallback(),
            "Location service ready"
        );
        Ok(service)
    }

    /// Collapse whitespace runs and trim. The result is the cache key.
    pub fn normalize_address(address: &str) -> Result<String> {
        let normalized = address.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.is_empty() {
            return Err(AppError::InvalidInput(
                "address must be a non-empty string".to_string(),
            ));
        }
        Ok(normalized)
    }

    pub fn geocode_address(&self, address: &str) -> Result<GeoPoint> {
        let normalized = Self::normalize_address(address)?;

        if let Some(point) = self.geocode_cache.get(&normalized) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Geocode cache hit: {}", normalized);
            return Ok(point);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Geocode cache miss: {}", normalized);
        let point = self.geocoder.geocode(&normalized)?;
        self.geocode_cache.insert(normalized, point);
        Ok(point)
    }

    pub fn estimate_travel_minutes(&self, origin: GeoPoint, destination: GeoPoint) -> Result<f64> {
        match self.router.estimate_travel_minutes(origin, destination) {
            Err(err @ AppError::Routing { .. }) => match self.fallback_router {
                Some(ref fallback) => {
                    tracing::warn!(
                        primary = self.router.name(),
                        fallback = fallback.name(),
                        "Routing failed ({}), using fallback estimate",
                        err
                    );
                    fallback.estimate_travel_minutes(origin, destination)
                }
                None => Err(err),
            },
            other => other,
        }
    }

    /// Autocomplete passthrough; short queries never reach the provider.
    pub fn suggest_addresses(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        let query = query.trim();
        if query.chars().count() < MIN_SUGGEST_QUERY_CHARS || limit == 0 {
            return Ok(Vec::new());
        }
        self.geocoder.suggest_addresses(query, limit)
    }

    pub fn routing_provider_name(&self) -> &'static str {
        self.router.name()
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback_router.is_some()
    }

    pub fn cache_stats(&self) -> GeocodeCacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let hit_rate = if hits + misses > 0 {
            (hits as f64 / (hits + misses) as f64) * 100.0
        } else {
            0.0
        };

        GeocodeCacheStats {
            hits,
            misses,
            hit_rate,
            entries: self.geocode_cache.entry_count(),
        }
    }

    #[cfg(test)]
    fn flush_cache_maintenance(&self) {
        self.geocode_cache.run_pending_tasks();
    }
}
