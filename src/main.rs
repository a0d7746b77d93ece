use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use whatsmyway::config::Config;
use whatsmyway::db::{EventStore, InMemoryEventStore};
use whatsmyway::services::location_service::LocationService;
use whatsmyway::services::recommendation::RecommendationEngine;
use whatsmyway::AppState;

// The location providers use blocking HTTP clients, which must be created and
// dropped outside the async runtime. The runtime is therefore built by hand.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "whatsmyway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting whatsmyway API server");
    tracing::info!("Configuration loaded successfully");

    // Initialize services
    let location = Arc::new(LocationService::from_config(&config.location)?);
    let engine = RecommendationEngine::new(&config.engine)?;
    let events: Arc<dyn EventStore> = Arc::new(InMemoryEventStore::new());

    let state = Arc::new(AppState {
        location: location.clone(),
        engine,
        events,
        default_buffer_minutes: config.engine.default_buffer_minutes,
    });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(serve(state, config.server_address()));

    // Last handle to the providers goes away here, after the runtime
    drop(runtime);
    drop(location);
    result
}

async fn serve(state: Arc<AppState>, addr: String) -> Result<(), Box<dyn std::error::Error>> {
    // Build router with CORS and tracing
    let app = Router::new()
        .nest("/api", whatsmyway::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
