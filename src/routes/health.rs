use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /health - Report the active providers and cache counters
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut status = json!({
        "status": "ok",
        "routing_provider": state.location.routing_provider_name(),
        "routing_fallback": state.location.has_fallback(),
        "geocode_cache": state.location.cache_stats(),
    });

    match state.events.count().await {
        Ok(count) => {
            status["event_count"] = json!(count);
        }
        Err(e) => {
            status["event_count"] = json!({"error": e.to_string()});
            status["status"] = json!("error");
        }
    }

    Json(status)
}
