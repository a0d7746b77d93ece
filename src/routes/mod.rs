pub mod addresses;
pub mod events;
pub mod health;
pub mod recommendations;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/events",
            get(events::list_events).post(events::create_event),
        )
        .route("/events/{id}", delete(events::delete_event))
        .route(
            "/recommendations",
            post(recommendations::get_recommendations),
        )
        .route("/addresses/suggest", get(addresses::suggest_addresses))
        .route("/addresses/validate", post(addresses::validate_address))
        .with_state(state)
}

/// Run provider-bound work off the async workers; location lookups block for
/// up to the provider timeout.
pub(crate) async fn run_blocking<F, T>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| AppError::Internal(format!("Blocking task failed: {}", e)))?
}

/// Names of required fields that are absent, in declaration order.
pub(crate) fn missing_fields(fields: &[(&'static str, bool)]) -> Result<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "missing fields: {}",
            missing.join(", ")
        )))
    }
}
