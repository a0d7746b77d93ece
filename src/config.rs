use crate::constants::*;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub location: LocationConfig,
    pub engine: EngineConfig,
}

/// Settings for the location providers. Provider names are kept as raw strings
/// here and validated when the [`LocationService`](crate::services::location_service::LocationService)
/// is built, so a bad value surfaces as a provider configuration error.
#[derive(Debug, Clone)]
pub struct LocationConfig {
    /// `geoapify` or `geoapify-haversine`
    pub provider: String,

    /// `off` or `haversine`
    pub routing_fallback: String,

    pub api_key: String,

    /// Travel mode for routing requests (`drive`, `truck`, `bicycle`, ...)
    pub route_mode: String,

    pub base_url: String,

    /// Per-request timeout for the network provider
    pub timeout_seconds: f64,

    /// Maximum number of memoized geocodes
    pub geocode_cache_capacity: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_LOCATION_PROVIDER.to_string(),
            routing_fallback: DEFAULT_ROUTING_FALLBACK.to_string(),
            api_key: String::new(),
            route_mode: DEFAULT_ROUTE_MODE.to_string(),
            base_url: GEOAPIFY_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            geocode_cache_capacity: DEFAULT_GEOCODE_CACHE_CAPACITY,
        }
    }
}

impl LocationConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let timeout_seconds: f64 = env::var("GEO_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| defaults.timeout_seconds.to_string())
            .parse()
            .map_err(|_| "Invalid GEO_TIMEOUT_SECONDS")?;
        if !timeout_seconds.is_finite() || timeout_seconds <= 0.0 {
            return Err("GEO_TIMEOUT_SECONDS must be a positive number of seconds".to_string());
        }

        let geocode_cache_capacity: u64 = env::var("GEOCODE_CACHE_CAPACITY")
            .unwrap_or_else(|_| defaults.geocode_cache_capacity.to_string())
            .parse()
            .map_err(|_| "Invalid GEOCODE_CACHE_CAPACITY")?;
        if geocode_cache_capacity == 0 {
            return Err("GEOCODE_CACHE_CAPACITY must be greater than 0".to_string());
        }

        Ok(Self {
            provider: env::var("LOCATION_PROVIDER")
                .map(|v| v.trim().to_lowercase())
                .unwrap_or(defaults.provider),
            routing_fallback: env::var("ROUTING_FALLBACK")
                .map(|v| v.trim().to_lowercase())
                .unwrap_or(defaults.routing_fallback),
            api_key: env::var("GEOAPIFY_API_KEY")
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
            route_mode: env::var("GEOAPIFY_ROUTE_MODE").unwrap_or(defaults.route_mode),
            base_url: env::var("GEOAPIFY_BASE_URL").unwrap_or(defaults.base_url),
            timeout_seconds,
            geocode_cache_capacity,
        })
    }
}

/// Knobs of the recommendation engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Hour at which the working day starts (free windows are clipped to it)
    pub workday_start_hour: u8,

    /// Hour at which the working day ends
    pub workday_end_hour: u8,

    /// Buffer used when a request does not carry one
    pub default_buffer_minutes: i64,

    /// Maximum number of ranked slots returned
    pub max_suggestions: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workday_start_hour: DAY_START_HOUR,
            workday_end_hour: DAY_END_HOUR,
            default_buffer_minutes: DEFAULT_BUFFER_MINUTES,
            max_suggestions: MAX_SUGGESTIONS,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let config = Self {
            workday_start_hour: env::var("WORKDAY_START_HOUR")
                .unwrap_or_else(|_| defaults.workday_start_hour.to_string())
                .parse()
                .map_err(|_| "Invalid WORKDAY_START_HOUR")?,

            workday_end_hour: env::var("WORKDAY_END_HOUR")
                .unwrap_or_else(|_| defaults.workday_end_hour.to_string())
                .parse()
                .map_err(|_| "Invalid WORKDAY_END_HOUR")?,

            default_buffer_minutes: env::var("DEFAULT_BUFFER_MINUTES")
                .unwrap_or_else(|_| defaults.default_buffer_minutes.to_string())
                .parse()
                .map_err(|_| "Invalid DEFAULT_BUFFER_MINUTES")?,

            max_suggestions: defaults.max_suggestions,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.workday_end_hour > 23 || self.workday_start_hour >= self.workday_end_hour {
            return Err(format!(
                "Working hours must satisfy start < end <= 23 (got {}..{})",
                self.workday_start_hour, self.workday_end_hour
            ));
        }
        if self.default_buffer_minutes < 0 {
            return Err("DEFAULT_BUFFER_MINUTES must be zero or positive".to_string());
        }
        Ok(())
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            location: LocationConfig::from_env()?,
            engine: EngineConfig::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
