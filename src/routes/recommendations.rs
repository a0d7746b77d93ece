use crate::error::{AppError, Result};
use crate::models::instant::parse_instant;
use crate::models::{CalendarEvent, RecommendationResult, SlotRequest};
use crate::routes::{missing_fields, run_blocking};
use crate::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub sales_rep_id: Option<String>,
    pub new_event_duration_min: Option<i64>,
    pub new_event_address: Option<String>,
    /// Falls back to the configured default buffer
    pub buffer_min: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub suggestions: Vec<RecommendationResult>,
}

/// POST /recommendations
/// Rank the best slots for a new visit in a rep's calendar
pub async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<RecommendationResponse>> {
    missing_fields(&[
        ("date_start", request.date_start.is_some()),
        ("date_end", request.date_end.is_some()),
        ("sales_rep_id", request.sales_rep_id.is_some()),
        ("new_event_duration_min", request.new_event_duration_min.is_some()),
        ("new_event_address", request.new_event_address.is_some()),
    ])?;

    let parse = |raw: Option<&str>| {
        parse_instant(raw.unwrap_or_default()).map_err(|_| {
            AppError::InvalidInput(
                "date_start and date_end must be valid ISO datetime values".to_string(),
            )
        })
    };
    let date_start = parse(request.date_start.as_deref())?;
    let date_end = parse(request.date_end.as_deref())?;
    if date_end <= date_start {
        return Err(AppError::InvalidInput(
            "date_end must be after date_start".to_string(),
        ));
    }

    let duration_minutes = request.new_event_duration_min.unwrap_or_default();
    if duration_minutes <= 0 {
        return Err(AppError::InvalidInput(
            "new_event_duration_min must be positive".to_string(),
        ));
    }
    let buffer_minutes = request
        .buffer_min
        .unwrap_or(state.default_buffer_minutes);
    if buffer_minutes < 0 {
        return Err(AppError::InvalidInput(
            "buffer_min must be zero or positive".to_string(),
        ));
    }

    let address = request
        .new_event_address
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    if address.is_empty() {
        return Err(AppError::InvalidInput(
            "new_event_address must be non-empty".to_string(),
        ));
    }
    let sales_rep_id = request.sales_rep_id.unwrap_or_default();

    tracing::info!(
        rep = %sales_rep_id,
        duration_minutes,
        buffer_minutes,
        "Recommendation request for rep {}: {} min (+{} min buffer)",
        sales_rep_id, duration_minutes, buffer_minutes
    );

    let events: Vec<CalendarEvent> = state
        .events
        .find_within(&sales_rep_id, date_start, date_end)
        .await?
        .iter()
        .map(CalendarEvent::from)
        .collect();

    let worker_state = state.clone();
    let suggestions = run_blocking(move || {
        let location = worker_state.location.geocode_address(&address)?;
        let slot_request = SlotRequest {
            date_start,
            date_end,
            location,
            duration_minutes,
            buffer_minutes,
        };
        worker_state
            .engine
            .recommend(&slot_request, &events, &worker_state.location)
    })
    .await?;

    tracing::info!("Returning {} suggestions", suggestions.len());
    Ok(Json(RecommendationResponse { suggestions }))
}
