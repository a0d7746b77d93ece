use crate::error::{AppError, Result};
use crate::models::instant::parse_instant;
use crate::models::{NewSalesEvent, SalesEvent};
use crate::routes::{missing_fields, run_blocking};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub sales_rep_id: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// GET /events?sales_rep_id=...&start=...&end=...
/// Events of one rep that touch the range
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EventsQuery>,
) -> Result<Json<Vec<SalesEvent>>> {
    missing_fields(&[
        ("sales_rep_id", query.sales_rep_id.is_some()),
        ("start", query.start.is_some()),
        ("end", query.end.is_some()),
    ])?;

    let start = parse_instant(query.start.as_deref().unwrap_or_default())?;
    let end = parse_instant(query.end.as_deref().unwrap_or_default())?;
    if end <= start {
        return Err(AppError::InvalidInput("end must be after start".to_string()));
    }

    let sales_rep_id = query.sales_rep_id.unwrap_or_default();
    let events = state
        .events
        .find_overlapping(&sales_rep_id, start, end)
        .await?;

    tracing::debug!("Listing {} events for rep {}", events.len(), sales_rep_id);
    Ok(Json(events))
}

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub title: Option<String>,
    pub address: Option<String>,
    pub start_at: Option<String>,
    pub end_at: Option<String>,
    pub sales_rep_id: Option<String>,
    pub time_zone: Option<String>,
}

/// POST /events
/// The address is geocoded once here and the coordinates are stored with the event.
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<SalesEvent>)> {
    missing_fields(&[
        ("title", request.title.is_some()),
        ("address", request.address.is_some()),
        ("start_at", request.start_at.is_some()),
        ("end_at", request.end_at.is_some()),
        ("sales_rep_id", request.sales_rep_id.is_some()),
    ])?;

    let start_at = parse_instant(request.start_at.as_deref().unwrap_or_default())?;
    let end_at = parse_instant(request.end_at.as_deref().unwrap_or_default())?;
    if end_at <= start_at {
        return Err(AppError::InvalidInput(
            "end_at must be after start_at".to_string(),
        ));
    }

    let title = request.title.unwrap_or_default().trim().to_string();
    if title.is_empty() {
        return Err(AppError::InvalidInput("title must be non-empty".to_string()));
    }
    let sales_rep_id = request.sales_rep_id.unwrap_or_default().trim().to_string();
    if sales_rep_id.is_empty() {
        return Err(AppError::InvalidInput(
            "sales_rep_id must be non-empty".to_string(),
        ));
    }
    let address = request.address.unwrap_or_default();

    let location_service = state.location.clone();
    let (address, location) = run_blocking(move || {
        let location = location_service.geocode_address(&address)?;
        Ok((address.trim().to_string(), location))
    })
    .await?;

    let event = state
        .events
        .insert(NewSalesEvent {
            title,
            address,
            start_at,
            end_at,
            location,
            sales_rep_id,
            time_zone: request.time_zone,
        })
        .await?;

    tracing::info!(id = %event.id, rep = %event.sales_rep_id, "Created event");
    Ok((StatusCode::CREATED, Json(event)))
}

/// DELETE /events/{id}
pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if state.events.delete(&id).await? {
        tracing::info!(id = %id, "Deleted event");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("event '{}' not found", id)))
    }
}
