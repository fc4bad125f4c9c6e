use crate::error::PredictError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced to HTTP clients.
///
/// Each variant has a fixed status code and JSON body; clients branch on the
/// `error` field (or on the presence of `errors` for validation failures).
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request body is not valid JSON")]
    InvalidJson,

    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("invalid soil or crop type")]
    InvalidCategory,

    #[error("encoders not loaded")]
    EncodersNotLoaded,

    #[error("prediction failed: {0}")]
    PredictionFailed(String),

    #[error("not found")]
    NotFound,
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson | ApiError::Validation(_) | ApiError::InvalidCategory => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::EncodersNotLoaded | ApiError::PredictionFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::InvalidJson => "invalid_json",
            ApiError::Validation(_) => "validation_failed",
            ApiError::InvalidCategory => "invalid_soil_or_crop",
            ApiError::EncodersNotLoaded => "encoders_not_loaded",
            ApiError::PredictionFailed(_) => "prediction_failed",
            ApiError::NotFound => "not_found",
        }
    }
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::Validation(errors) => ApiError::Validation(errors),
            PredictError::InvalidCategory(_) => ApiError::InvalidCategory,
            PredictError::PredictionFailed(message) => ApiError::PredictionFailed(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::Validation(errors) => json!({ "errors": errors }),
            ApiError::PredictionFailed(message) => json!({
                "error": "prediction_failed",
                "message": message,
            }),
            other => json!({ "error": other.error_code() }),
        };

        (status, Json(body)).into_response()
    }
}
