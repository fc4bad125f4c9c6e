//! HTTP-level tests driving the router in-process.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use fertirec::ArtifactStore;
use fertirec::server::{ServerConfig, ServerState, build_router, load_store};
use http_body_util::BodyExt;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

mod common;

use common::{artifact_dir, sample_payload};

fn app_with_store() -> axum::Router {
    let dir = artifact_dir();
    let store = Arc::new(ArtifactStore::load(dir.path()).unwrap());
    build_router(Arc::new(ServerState::new(ServerConfig::default(), Some(store))))
}

fn app_without_store() -> axum::Router {
    build_router(Arc::new(ServerState::new(ServerConfig::default(), None)))
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

#[tokio::test]
async fn health_and_banner() {
    let (status, body) = send(app_without_store(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    let (status, body) = send(app_with_store(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "service": "fertilizer-recommendation", "status": "ready" }));
}

#[tokio::test]
async fn classes_lists_encoder_vocabularies() {
    let (status, body) = send(app_with_store(), get("/api/classes")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["soil_types"], json!(common::SOIL_TYPES));
    assert_eq!(body["crop_types"], json!(common::CROP_TYPES));
}

#[tokio::test]
async fn classes_without_encoders_is_a_500() {
    for _ in 0..3 {
        let (status, body) = send(app_without_store(), get("/api/classes")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "encoders_not_loaded" }));
    }
}

#[tokio::test]
async fn predict_success() {
    let (status, body) = send(app_with_store(), post_json(sample_payload().to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fertilizer"], "Urea");
    let confidence = body["confidence"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&confidence));
    assert_eq!(body["details"]["application_rate"], "100-200 kg/ha");
    assert!(body["details"]["benefits"].is_array());
    assert!(body["details"]["best_for"].is_array());
    assert!(body.get("fallback_details").is_none());
}

#[tokio::test]
async fn predict_rejects_unparsable_body() {
    let (status, body) = send(app_with_store(), post_json("{\"temperature\": ")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "invalid_json" }));
}

#[tokio::test]
async fn predict_parses_body_regardless_of_content_type() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/predict")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(sample_payload().to_string()))
        .unwrap();
    let (status, _) = send(app_with_store(), request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn predict_reports_every_validation_error() {
    let mut payload = sample_payload();
    payload["temperature"] = json!(61);
    payload["humidity"] = json!(-5);

    let (status, body) = send(app_with_store(), post_json(payload.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "errors": [
            "Temperature must be between 0 and 60 C",
            "Humidity must be between 0 and 100 %"
        ]})
    );
}

#[tokio::test]
async fn predict_reports_missing_fields_once() {
    let (status, body) = send(app_with_store(), post_json(r#"{"temperature": 30}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "errors": [
            "Missing field(s): humidity, moisture, soil_type, crop_type, nitrogen, potassium, phosphorous"
        ]})
    );
}

#[tokio::test]
async fn predict_unknown_category() {
    let mut payload = sample_payload();
    payload["soil_type"] = json!("Moon Dust");

    let (status, body) = send(app_with_store(), post_json(payload.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "invalid_soil_or_crop" }));
}

#[tokio::test]
async fn predict_without_artifacts_fails_as_server_error() {
    let (status, body) = send(app_without_store(), post_json(sample_payload().to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "prediction_failed");
    assert_eq!(body["message"], "model artifacts not loaded");
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (status, body) = send(app_with_store(), get("/api/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "not_found" }));
}

#[tokio::test]
async fn request_id_is_echoed() {
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .unwrap();
    let response = app_with_store().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "abc-123");

    let response = app_with_store().oneshot(get("/health")).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn metrics_endpoint_absent_without_recorder() {
    let response = app_with_store().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn metrics_count_prediction_outcomes() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let dir = artifact_dir();
    let store = Arc::new(ArtifactStore::load(dir.path()).unwrap());
    let state =
        ServerState::new(ServerConfig::default(), Some(store)).with_metrics(recorder.handle());
    let app = build_router(Arc::new(state));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let rendered = metrics::with_local_recorder(&recorder, || {
        runtime.block_on(async {
            let (status, _) = send(app.clone(), post_json(sample_payload().to_string())).await;
            assert_eq!(status, StatusCode::OK);

            let mut unknown = sample_payload();
            unknown["soil_type"] = json!("Moon Dust");
            let (status, _) = send(app.clone(), post_json(unknown.to_string())).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);

            let response = app.oneshot(get("/metrics")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            String::from_utf8(bytes.to_vec()).unwrap()
        })
    });

    assert!(
        rendered.contains(r#"fertirec_predictions_total{outcome="ok"} 1"#),
        "{rendered}"
    );
    assert!(
        rendered.contains(r#"fertirec_predictions_total{outcome="invalid_category"} 1"#),
        "{rendered}"
    );
    assert!(
        rendered.contains("fertirec_prediction_duration_seconds_count 2"),
        "{rendered}"
    );
}

#[test]
fn failed_load_is_fatal_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig {
        model_path: dir.path().to_path_buf(),
        ..Default::default()
    };
    let err = load_store(&config).unwrap_err();
    assert!(err.to_string().contains("failed to load model artifacts"));
}

#[tokio::test]
async fn degraded_start_serves_without_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig {
        model_path: dir.path().to_path_buf(),
        allow_degraded_start: true,
        ..Default::default()
    };
    let store = load_store(&config).unwrap();
    assert!(store.is_none());

    let state = ServerState::new(config, store);
    assert!(!state.is_ready());
    let (status, body) = send(build_router(Arc::new(state)), get("/api/classes")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "encoders_not_loaded" }));
}
