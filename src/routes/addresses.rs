use crate::constants::DEFAULT_SUGGESTION_LIMIT;
use crate::error::Result;
use crate::routes::{missing_fields, run_blocking};
use crate::services::location_service::LocationService;
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<String>,
}

/// GET /addresses/suggest?q=...
pub async fn suggest_addresses(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SuggestQuery>,
) -> Result<Json<SuggestResponse>> {
    let location = state.location.clone();
    let suggestions = run_blocking(move || {
        location.suggest_addresses(&query.q, DEFAULT_SUGGESTION_LIMIT)
    })
    .await?;

    Ok(Json(SuggestResponse { suggestions }))
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub normalized_address: String,
    pub lat: f64,
    pub lng: f64,
}

/// POST /addresses/validate
/// An address is valid when the geocoder resolves it; failures surface as errors.
pub async fn validate_address(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>> {
    missing_fields(&[("address", request.address.is_some())])?;
    let address = request.address.unwrap_or_default();

    let location = state.location.clone();
    let response = run_blocking(move || {
        let normalized_address = LocationService::normalize_address(&address)?;
        let point = location.geocode_address(&normalized_address)?;
        Ok(ValidateResponse {
            valid: true,
            normalized_address,
            lat: point.lat,
            lng: point.lng,
        })
    })
    .await?;

    Ok(Json(response))
}
