use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tourbook_core::CoreError;

pub const INVALID_ID: &str = "Invalid ID";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => AppError::BadRequest(msg),
            CoreError::InvalidId(_) => AppError::BadRequest(INVALID_ID.to_string()),
            CoreError::NotFound(msg) => AppError::NotFound(msg),
            CoreError::Identity(msg) => {
                tracing::debug!("Identity rejected: {}", msg);
                AppError::Forbidden("forbidden access".to_string())
            }
            err @ (CoreError::Store(_) | CoreError::Gateway(_)) => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// `axum::Json` whose rejections render as `{message}` 400s.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_statuses() {
        let cases = [
            (CoreError::Validation("Missing required fields".into()), StatusCode::BAD_REQUEST),
            (CoreError::InvalidId("zz".into()), StatusCode::BAD_REQUEST),
            (CoreError::NotFound("Package not found".into()), StatusCode::NOT_FOUND),
            (CoreError::Identity("bad sig".into()), StatusCode::FORBIDDEN),
            (CoreError::Store("connection reset".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (CoreError::Gateway("card declined".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_invalid_id_message() {
        let err = AppError::from(CoreError::InvalidId("zz".into()));
        assert_eq!(err.to_string(), INVALID_ID);
    }
}
