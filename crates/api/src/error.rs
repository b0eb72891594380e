use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use consentry_core::error::CoreError;
use serde_json::{json, Value};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds the HTTP-only
/// `BadRequest` for extractor rejections.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `consentry_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A malformed request: unparseable body, path or query string.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = details;
        }

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String, Option<Value>) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
            None,
        ),
        CoreError::Validation(msg) => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            msg.clone(),
            None,
        ),
        CoreError::Unauthenticated(msg) => (
            StatusCode::UNAUTHORIZED,
            "UNAUTHENTICATED",
            msg.clone(),
            None,
        ),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone(), None),
        CoreError::InvalidState(msg) => {
            (StatusCode::CONFLICT, "INVALID_STATE", msg.clone(), None)
        }
        // Backend detail stays in the logs; the store already logged it.
        CoreError::Storage(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "STORAGE_FAILURE",
            "Storage is temporarily unavailable".to_string(),
            Some(json!({ "retryable": true })),
        ),
        CoreError::EmergencyStopPartialFailure {
            cancelled_bookings,
            secured_content,
            message,
        } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "EMERGENCY_STOP_PARTIAL_FAILURE",
            message.clone(),
            Some(json!({
                "cancelled_bookings": cancelled_bookings,
                "secured_content": secured_content,
            })),
        ),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
                None,
            )
        }
    }
}
