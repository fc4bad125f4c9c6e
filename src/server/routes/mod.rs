//! API route handlers
//!
//! - `health`: liveness, service info and metrics
//! - `classes`: soil/crop vocabularies for client-side forms
//! - `predict`: fertilizer recommendation

pub mod classes;
pub mod health;
pub mod predict;

use super::error::ApiError;
use axum::Json;
use axum::response::IntoResponse;
use serde_json::json;

/// Name reported by `GET /`.
pub const SERVICE_NAME: &str = "fertilizer-recommendation";

/// Service banner (GET /)
///
/// ```json
/// { "service": "fertilizer-recommendation", "status": "ready" }
/// ```
pub async fn service_info() -> impl IntoResponse {
    Json(json!({
        "service": SERVICE_NAME,
        "status": "ready",
    }))
}

/// 404 Not Found handler
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
