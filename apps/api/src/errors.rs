use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::extract::ExtractError;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ExtractError> for AppError {
    fn from(e: ExtractError) -> Self {
        AppError::UnprocessableEntity(e.to_string())
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Analysis(AnalysisError::Configuration(msg)) => {
                tracing::error!("AI configuration error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    "The AI service is not configured".to_string(),
                )
            }
            AppError::Analysis(AnalysisError::ProviderUnavailable(failures)) => {
                for failure in failures {
                    tracing::error!("AI tier {} failed: {}", failure.model, failure.reason);
                }
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "AI_UNAVAILABLE",
                    self.to_string(),
                )
            }
            AppError::Analysis(AnalysisError::MalformedResponse(msg)) => {
                tracing::error!("Malformed AI response: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "MALFORMED_AI_RESPONSE",
                    "The AI service returned an unreadable result".to_string(),
                )
            }
            AppError::Store(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
