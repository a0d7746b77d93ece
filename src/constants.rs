//! Stable application-wide constants.
//!
//! Values here are algorithm coefficients and default fallbacks for
//! env-var-based configuration. Anything worth tuning per deployment is also
//! exposed through [`Config`](crate::config::Config).

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "5000";

// --- Location providers ---

/// Default Geoapify API root. Overridden by `GEOAPIFY_BASE_URL`.
pub const GEOAPIFY_BASE_URL: &str = "https://api.geoapify.com/v1";
/// Default request timeout for the network provider (seconds).
pub const DEFAULT_TIMEOUT_SECONDS: f64 = 8.0;
/// Default travel mode sent to the routing endpoint.
pub const DEFAULT_ROUTE_MODE: &str = "drive";
/// Default provider selection. Overridden by `LOCATION_PROVIDER`.
pub const DEFAULT_LOCATION_PROVIDER: &str = "geoapify";
/// Default fallback routing selection. Overridden by `ROUTING_FALLBACK`.
pub const DEFAULT_ROUTING_FALLBACK: &str = "off";

// --- Travel time estimation ---

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
/// Average urban driving speed assumed by the analytic estimator.
pub const AVERAGE_CITY_SPEED_KMH: f64 = 35.0;
/// Congestion multiplier applied on top of the average speed.
pub const TRAFFIC_MULTIPLIER: f64 = 1.2;
/// No trip is ever estimated below this many minutes (parking, walking to the door).
pub const MIN_TRAVEL_MINUTES: f64 = 2.0;

// --- Geocode cache ---

/// Maximum entries in the geocode cache (LRU eviction).
pub const DEFAULT_GEOCODE_CACHE_CAPACITY: u64 = 2_048;

// --- Address autocomplete ---

/// Queries shorter than this never reach the provider.
pub const MIN_SUGGEST_QUERY_CHARS: usize = 3;
/// Number of suggestions returned by the HTTP endpoint.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

// --- Recommendation engine ---

/// Working day start hour used to clip free windows.
pub const DAY_START_HOUR: u8 = 8;
/// Working day end hour used to clip free windows.
pub const DAY_END_HOUR: u8 = 19;
/// Maximum number of ranked slots returned per call.
pub const MAX_SUGGESTIONS: usize = 10;
/// Buffer applied when a request does not specify one.
pub const DEFAULT_BUFFER_MINUTES: i64 = 10;
