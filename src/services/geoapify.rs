use crate::constants::{DEFAULT_ROUTE_MODE, GEOAPIFY_BASE_URL};
use crate::error::{AppError, Result};
use crate::models::GeoPoint;
use crate::services::providers::{floor_and_round_minutes, GeocodingProvider, RoutingProvider};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Network-backed geocoding, autocomplete and routing against the Geoapify API.
#[derive(Clone)]
pub struct GeoapifyClient {
    client: Client,
    api_key: String,
    base_url: String,
    mode: String,
}

/// Why a single HTTP exchange failed, before it is attributed to geocoding or routing.
#[derive(Error, Debug)]
enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

impl GeoapifyClient {
    /// Fails fast with `ProviderMisconfigured` when the key is missing.
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AppError::ProviderMisconfigured(
                "GEOAPIFY_API_KEY is required when LOCATION_PROVIDER uses geoapify".to_string(),
            ));
        }

        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            AppError::ProviderMisconfigured(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(GeoapifyClient {
            client,
            api_key,
            base_url: GEOAPIFY_BASE_URL.to_string(),
            mode: DEFAULT_ROUTE_MODE.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Travel mode sent to the routing endpoint (`drive`, `truck`, `bicycle`, ...).
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> std::result::Result<T, FetchError> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(endpoint = path, "Geoapify request: {}", path);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(status = %status, endpoint = path, "Geoapify HTTP error {}: {}", status, body);
            return Err(FetchError::Status { status, body });
        }

        Ok(response.json()?)
    }
}

impl GeocodingProvider for GeoapifyClient {
    fn geocode(&self, address: &str) -> Result<GeoPoint> {
        let payload: FeatureCollection = self
            .get_json("geocode/search", &[("text", address), ("limit", "1")])
            .map_err(|e| {
                AppError::geocoding_caused_by(
                    format!("Failed to geocode address '{}': {}", address, e),
                    e,
                )
            })?;

        let feature = payload.features.into_iter().next().ok_or_else(|| {
            tracing::warn!("Geoapify returned no match for '{}'", address);
            AppError::geocoding(format!("No geocoding result found for address '{}'", address))
        })?;

        match (feature.properties.lat, feature.properties.lon) {
            (Some(lat), Some(lng)) => Ok(GeoPoint { lat, lng }),
            _ => Err(AppError::geocoding(format!(
                "Invalid geocoding response for address '{}'",
                address
            ))),
        }
    }

    fn suggest_addresses(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        let limit_param = limit.to_string();
        let payload: FeatureCollection = self
            .get_json(
                "geocode/autocomplete",
                &[("text", query), ("limit", limit_param.as_str())],
            )
            .map_err(|e| {
                AppError::geocoding_caused_by(
                    format!("Failed to fetch suggestions for '{}': {}", query, e),
                    e,
                )
            })?;

        let mut suggestions: Vec<String> = Vec::with_capacity(limit);
        for label in payload
            .features
            .into_iter()
            .filter_map(|f| f.properties.formatted)
        {
            if suggestions.len() == limit {
                break;
            }
            if !suggestions.contains(&label) {
                suggestions.push(label);
            }
        }
        Ok(suggestions)
    }
}

impl RoutingProvider for GeoapifyClient {
    fn estimate_travel_minutes(&self, origin: GeoPoint, destination: GeoPoint) -> Result<f64> {
        let waypoints = format!(
            "{},{}|{},{}",
            origin.lat, origin.lng, destination.lat, destination.lng
        );
        let payload: FeatureCollection = self
            .get_json(
                "routing",
                &[("waypoints", waypoints.as_str()), ("mode", self.mode.as_str())],
            )
            .map_err(|e| AppError::routing_caused_by(format!("Failed to estimate route: {}", e), e))?;

        let feature = payload.features.into_iter().next().ok_or_else(|| {
            tracing::warn!(mode = %self.mode, "Geoapify returned 0 routes for {} -> {}", origin, destination);
            AppError::routing(format!(
                "No route returned for mode='{}' origin={} destination={}",
                self.mode, origin, destination
            ))
        })?;

        let seconds = feature.properties.time.ok_or_else(|| {
            AppError::routing("Route response did not include travel time".to_string())
        })?;

        let minutes = floor_and_round_minutes(seconds / 60.0);
        tracing::debug!(minutes, mode = %self.mode, "Geoapify route: {:.1} min", minutes);
        Ok(minutes)
    }

    fn name(&self) -> &'static str {
        "geoapify"
    }
}

// Geoapify response types (GeoJSON feature collections)

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: FeatureProperties,
}

#[derive(Debug, Default, Deserialize)]
struct FeatureProperties {
    lat: Option<f64>,
    lon: Option<f64>,
    /// Route duration in seconds.
    time: Option<f64>,
    formatted: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use std::error::Error as _;

    fn client_for(server: &mockito::Server) -> GeoapifyClient {
        GeoapifyClient::new("test-key", Duration::from_secs(2))
            .unwrap()
            .with_base_url(server.url())
    }

    #[test]
    fn test_missing_key_is_a_configuration_error() {
        let result = GeoapifyClient::new("   ", Duration::from_secs(8));
        assert!(matches!(result, Err(AppError::ProviderMisconfigured(_))));
    }

    #[test]
    fn test_builder_defaults() {
        let client = GeoapifyClient::new("k", Duration::from_secs(8)).unwrap();
        assert_eq!(client.base_url, GEOAPIFY_BASE_URL);
        assert_eq!(client.mode(), "drive");

        let client = client.with_base_url("http://localhost:4000/v1/").with_mode("truck");
        assert_eq!(client.base_url, "http://localhost:4000/v1");
        assert_eq!(client.mode(), "truck");
    }

    #[test]
    fn test_geocode_parses_first_feature() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/geocode/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("text".into(), "11 rue de Rivoli".into()),
                Matcher::UrlEncoded("limit".into(), "1".into()),
                Matcher::UrlEncoded("apiKey".into(), "test-key".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"features":[
                    {"properties":{"lat":48.8556,"lon":2.3601,"formatted":"11 Rue de Rivoli"}},
                    {"properties":{"lat":1.0,"lon":1.0}}
                ]}"#,
            )
            .create();

        let point = client_for(&server).geocode("11 rue de Rivoli").unwrap();
        assert_eq!(point, GeoPoint { lat: 48.8556, lng: 2.3601 });
        mock.assert();
    }

    #[test]
    fn test_geocode_without_match_fails() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/geocode/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"features":[]}"#)
            .create();

        let result = client_for(&server).geocode("nowhere");
        assert!(matches!(result, Err(AppError::Geocoding { .. })));
    }

    #[test]
    fn test_geocode_missing_fields_fails() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/geocode/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"features":[{"properties":{"lat":48.1}}]}"#)
            .create();

        let result = client_for(&server).geocode("half an answer");
        assert!(matches!(result, Err(AppError::Geocoding { .. })));
    }

    #[test]
    fn test_http_error_is_wrapped_with_cause() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/geocode/search")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body("invalid apiKey")
            .create();

        let err = client_for(&server).geocode("anything").unwrap_err();
        assert!(matches!(err, AppError::Geocoding { .. }));
        assert!(err.to_string().contains("HTTP 401"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_route_minutes_are_floored_and_rounded() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/routing")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("waypoints".into(), "48.8606,2.3376|48.8738,2.295".into()),
                Matcher::UrlEncoded("mode".into(), "drive".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"features":[{"properties":{"time":754.0,"distance":4200}}]}"#)
            .create();

        let client = client_for(&server);
        let minutes = client
            .estimate_travel_minutes(
                GeoPoint { lat: 48.8606, lng: 2.3376 },
                GeoPoint { lat: 48.8738, lng: 2.295 },
            )
            .unwrap();
        assert_eq!(minutes, 12.6);
        mock.assert();

        server
            .mock("GET", "/routing")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"features":[{"properties":{"time":30.0}}]}"#)
            .create();
        let short = client
            .estimate_travel_minutes(GeoPoint { lat: 1.0, lng: 1.0 }, GeoPoint { lat: 1.0, lng: 1.0001 })
            .unwrap();
        assert_eq!(short, 2.0);
    }

    #[test]
    fn test_route_failures() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/routing")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"features":[]}"#)
            .create();

        let client = client_for(&server);
        let a = GeoPoint { lat: 1.0, lng: 1.0 };
        let b = GeoPoint { lat: 2.0, lng: 2.0 };
        assert!(matches!(
            client.estimate_travel_minutes(a, b),
            Err(AppError::Routing { .. })
        ));

        server.reset();
        server
            .mock("GET", "/routing")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"features":[{"properties":{"distance":1200}}]}"#)
            .create();
        let err = client.estimate_travel_minutes(a, b).unwrap_err();
        assert!(err.to_string().contains("travel time"));

        server.reset();
        server
            .mock("GET", "/routing")
            .match_query(Matcher::Any)
            .with_status(502)
            .create();
        assert!(matches!(
            client.estimate_travel_minutes(a, b),
            Err(AppError::Routing { source: Some(_), .. })
        ));
    }

    #[test]
    fn test_transport_failure_is_a_routing_error() {
        // Nothing listens on port 9 locally.
        let client = GeoapifyClient::new("k", Duration::from_millis(500))
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let result = client.estimate_travel_minutes(
            GeoPoint { lat: 1.0, lng: 1.0 },
            GeoPoint { lat: 2.0, lng: 2.0 },
        );
        assert!(matches!(result, Err(AppError::Routing { source: Some(_), .. })));
    }

    #[test]
    fn test_suggestions_are_deduplicated_and_limited() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/geocode/autocomplete")
            .match_query(Matcher::UrlEncoded("text".into(), "11 rue".into()))
            .with_status(200)
            .with_body(
                r#"{"features":[
                    {"properties":{"formatted":"11 Rue de Rivoli, Paris"}},
                    {"properties":{"formatted":"11 Rue de Rivoli, Paris"}},
                    {"properties":{}},
                    {"properties":{"formatted":"11 Rue du Bac, Paris"}},
                    {"properties":{"formatted":"11 Rue Oberkampf, Paris"}}
                ]}"#,
            )
            .create();

        let suggestions = client_for(&server).suggest_addresses("11 rue", 2).unwrap();
        assert_eq!(
            suggestions,
            vec!["11 Rue de Rivoli, Paris".to_string(), "11 Rue du Bac, Paris".to_string()]
        );
    }
}
