use crate::artifacts::CategoryList;
use crate::server::error::{ApiError, ApiResult};
use crate::server::state::ServerState;
use axum::Json;
use axum::extract::State;
use std::sync::Arc;

/// Valid soil and crop types (GET /api/classes)
///
/// ```json
/// { "soil_types": ["Black", "Clayey", ...], "crop_types": ["Barley", ...] }
/// ```
///
/// Answers 500 `encoders_not_loaded` when the server runs without artifacts.
pub async fn list_classes(State(state): State<Arc<ServerState>>) -> ApiResult<Json<CategoryList>> {
    let store = state.store().ok_or(ApiError::EncodersNotLoaded)?;
    Ok(Json(store.categories()))
}
