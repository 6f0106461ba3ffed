use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use linguist_core::error::CoreError;
use linguist_db::StoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `linguist_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A store error that reached a handler without passing through a service.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Store(err) => classify_core_error(CoreError::from(err)),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map a domain error onto an HTTP status, error code, and message.
///
/// Internal details are logged and replaced with a generic message.
fn classify_core_error(core: CoreError) -> (StatusCode, &'static str, String) {
    let code = core.code();
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            code,
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, code, msg),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, code, msg),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, code, msg),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, code, msg),
        CoreError::Unavailable(msg) => {
            tracing::warn!(error = %msg, "Dependency unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                code,
                "A dependency is temporarily unavailable".to_string(),
            )
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                code,
                "An internal error occurred".to_string(),
            )
        }
    }
}
