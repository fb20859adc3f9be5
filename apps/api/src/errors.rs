use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Message returned when the model's reply cannot be turned into a score report.
pub const RETRY_MESSAGE: &str = "Failed to analyze the resume. Please try again.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Uploaded file exceeds the size limit")]
    PayloadTooLarge,

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Carries the raw completion text for the log. Never sent to the client.
    #[error("Upstream returned an unusable response")]
    UpstreamFormat(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        AppError::Llm(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PayloadTooLarge => (
                StatusCode::BAD_REQUEST,
                "PAYLOAD_TOO_LARGE",
                "File too large. Maximum size is 10MB".to_string(),
            ),
            AppError::InvalidDocument(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_DOCUMENT", msg.clone())
            }
            AppError::UpstreamFormat(raw) => {
                tracing::error!("Unparseable completion: {raw}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_FORMAT_ERROR",
                    RETRY_MESSAGE.to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            // The raw renderer message is surfaced as-is.
            AppError::Render(msg) => {
                tracing::error!("Render error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "RENDER_ERROR", msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_family_is_bad_request() {
        for err in [
            AppError::Validation("x".into()),
            AppError::PayloadTooLarge,
            AppError::InvalidDocument("x".into()),
        ] {
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_upstream_and_render_are_server_errors() {
        for err in [
            AppError::UpstreamFormat("{trunc".into()),
            AppError::Llm("boom".into()),
            AppError::Render("boom".into()),
            AppError::Internal(anyhow::anyhow!("boom")),
        ] {
            assert_eq!(
                err.into_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }
}
