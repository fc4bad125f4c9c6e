//! HTTP REST API for fertilizer recommendations
//!
//! # API Endpoints
//!
//! - `GET /` - Service banner
//! - `GET /health` - Liveness probe
//! - `GET /metrics` - Prometheus metrics (when enabled)
//! - `GET /api/classes` - Valid soil and crop types
//! - `POST /api/predict` - Recommend a fertilizer
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fertirec::server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     fertirec::server::start_server(config).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use state::ServerState;

use crate::artifacts::ArtifactStore;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusBuilder;
use middleware::{log_requests, request_id};
use routes::{classes, health, not_found, predict, service_info};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// Build the Axum router with all routes and middleware
///
/// Middleware stack, outermost first:
/// 1. Request ID tracking
/// 2. Request logging
/// 3. HTTP tracing
/// 4. CORS
/// 5. Timeout handling
/// 6. Body size limit
pub fn build_router(state: Arc<ServerState>) -> Router {
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics))
        .route("/api/classes", get(classes::list_classes))
        .route("/api/predict", post(predict::predict))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(state.config.max_body_size()))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.timeout(),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .with_state(state)
}

/// Initialise the global tracing subscriber from the configured filter and format.
pub fn init_tracing(config: &ServerConfig) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true);

    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.pretty().init();
    }
}

/// Load artifacts according to the configuration.
///
/// A load failure is returned as an error unless `allow_degraded_start` is
/// set, in which case it is logged and the server starts without a store.
pub fn load_store(config: &ServerConfig) -> anyhow::Result<Option<Arc<ArtifactStore>>> {
    match ArtifactStore::load(&config.model_path) {
        Ok(store) => Ok(Some(Arc::new(store))),
        Err(err) if config.allow_degraded_start => {
            tracing::error!(
                error = %err,
                path = %config.model_path.display(),
                "failed to load model artifacts, serving without them"
            );
            Ok(None)
        }
        Err(err) => Err(anyhow::Error::new(err).context(format!(
            "failed to load model artifacts from {}",
            config.model_path.display()
        ))),
    }
}

/// Start the HTTP server
///
/// Sets up logging, loads the artifacts once, builds the router and serves
/// until SIGTERM or Ctrl+C.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    init_tracing(&config);

    let store = load_store(&config)?;

    let mut state = ServerState::new(config.clone(), store);
    if config.metrics_enabled {
        let handle = PrometheusBuilder::new().install_recorder()?;
        state = state.with_metrics(handle);
    }
    let ready = state.is_ready();

    let app = build_router(Arc::new(state));

    let addr: SocketAddr = config.socket_addr()?;

    tracing::info!(
        "Starting fertilizer recommendation server on {} (artifacts loaded: {})",
        addr,
        ready
    );
    tracing::info!(
        "Timeout: {}s, Max body: {}KB, CORS: {}, Metrics: {}",
        config.timeout_secs,
        config.max_body_size_kb,
        config.enable_cors,
        config.metrics_enabled
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
