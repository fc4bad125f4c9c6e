use crate::pipeline::PredictionResult;
use crate::server::error::{ApiError, ApiResult};
use crate::server::middleware::RequestId;
use crate::server::state::ServerState;
use axum::Extension;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Recommend a fertilizer (POST /api/predict)
///
/// The body is parsed here rather than through the `Json` extractor so that
/// any unparsable body, whatever its content type, yields `invalid_json`.
///
/// # Example
/// ```json
/// // Request
/// {
///   "temperature": 30, "humidity": 60, "moisture": 40,
///   "soil_type": "Sandy", "crop_type": "Wheat",
///   "nitrogen": 50, "potassium": 50, "phosphorous": 50
/// }
///
/// // Response
/// {
///   "fertilizer": "Urea",
///   "confidence": 0.83,
///   "details": {
///     "description": "High nitrogen content fertilizer (46% N)",
///     "benefits": ["..."],
///     "best_for": ["..."],
///     "application_rate": "100-200 kg/ha",
///     "timing": "Pre-planting and top-dressing"
///   }
/// }
/// ```
pub async fn predict(
    State(state): State<Arc<ServerState>>,
    request_id: Option<Extension<RequestId>>,
    body: Bytes,
) -> ApiResult<Json<PredictionResult>> {
    let request_id = request_id.map(|Extension(id)| id.0).unwrap_or_default();
    let payload: Value = serde_json::from_slice(&body).map_err(|_| ApiError::InvalidJson)?;

    let predictor = state
        .predictor
        .as_ref()
        .ok_or_else(|| ApiError::PredictionFailed("model artifacts not loaded".into()))?;

    let start = Instant::now();
    let result = predictor.predict(&payload);
    metrics::histogram!("fertirec_prediction_duration_seconds")
        .record(start.elapsed().as_secs_f64());

    match result {
        Ok(result) => {
            metrics::counter!("fertirec_predictions_total", "outcome" => "ok").increment(1);
            Ok(Json(result))
        }
        Err(err) => {
            metrics::counter!("fertirec_predictions_total", "outcome" => err.outcome())
                .increment(1);
            if err.is_client_error() {
                tracing::debug!(request_id = %request_id, error = %err, "rejected prediction request");
            } else {
                tracing::error!(request_id = %request_id, error = %err, "prediction failed");
            }
            Err(err.into())
        }
    }
}
