use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Boxed underlying cause kept for diagnostics (transport or decoding error).
pub type Cause = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum AppError {
    /// Setup-time failure: missing credentials, unknown provider name.
    #[error("Provider misconfigured: {0}")]
    ProviderMisconfigured(String),

    #[error("Geocoding failed: {message}")]
    Geocoding {
        message: String,
        #[source]
        source: Option<Cause>,
    },

    #[error("Routing failed: {message}")]
    Routing {
        message: String,
        #[source]
        source: Option<Cause>,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn geocoding(message: impl Into<String>) -> Self {
        AppError::Geocoding {
            message: message.into(),
            source: None,
        }
    }

    pub fn geocoding_caused_by(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Geocoding {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn routing(message: impl Into<String>) -> Self {
        AppError::Routing {
            message: message.into(),
            source: None,
        }
    }

    pub fn routing_caused_by(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Routing {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Upstream failures may succeed on a later attempt; everything else must be fixed first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Geocoding { .. } | AppError::Routing { .. })
    }
}

// Convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_message = self.to_string();
        let status = match self {
            AppError::ProviderMisconfigured(ref e) => {
                tracing::error!("Location provider misconfigured: {}", e);
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Geocoding { ref message, .. } => {
                tracing::warn!("Geocoding failure: {}", message);
                StatusCode::BAD_GATEWAY
            }
            AppError::Routing { ref message, .. } => {
                tracing::warn!("Routing failure: {}", message);
                StatusCode::BAD_GATEWAY
            }
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": status.canonical_reason().unwrap_or("Unknown error"),
            "message": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
