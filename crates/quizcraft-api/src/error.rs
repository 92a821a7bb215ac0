//! Quizcraft — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quizcraft_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed.
    #[error("migration error: {0}")]
    Migration(DomainError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// The offending input field, for validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}

impl ErrorBody {
    /// Opaque body for failures the user cannot fix.
    #[must_use]
    pub fn internal(error: &'static str) -> Self {
        Self {
            error,
            message: "something went wrong, please try again later".to_owned(),
            field: None,
        }
    }
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
            DomainError::NotFound { .. } | DomainError::LessonNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            DomainError::StaleQuestion { .. } | DomainError::DuplicateAnswer { .. } => {
                StatusCode::CONFLICT
            }
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self.0 {
            DomainError::Persistence(detail) => {
                error!(error = %detail, "persistence failure");
                ErrorBody::internal(self.0.code())
            }
            DomainError::Validation { field, message } => ErrorBody {
                error: self.0.code(),
                message: message.clone(),
                field: Some(*field),
            },
            other => ErrorBody {
                error: other.code(),
                message: other.to_string(),
                field: None,
            },
        };

        (status, Json(body)).into_response()
    }
}
