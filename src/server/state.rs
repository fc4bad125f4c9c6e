use super::config::ServerConfig;
use crate::artifacts::ArtifactStore;
use crate::pipeline::Predictor;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state
///
/// Built once before the listener starts and never mutated afterwards.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Prediction pipeline over the loaded artifacts; `None` when the server
    /// was started in degraded mode after a failed load.
    pub predictor: Option<Predictor>,

    /// Renders the Prometheus exposition for `/metrics`
    pub metrics: Option<PrometheusHandle>,
}

impl ServerState {
    /// Create new server state
    pub fn new(config: ServerConfig, store: Option<Arc<ArtifactStore>>) -> Self {
        Self {
            config: Arc::new(config),
            predictor: store.map(Predictor::new),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn store(&self) -> Option<&ArtifactStore> {
        self.predictor.as_ref().map(Predictor::store)
    }

    pub fn is_ready(&self) -> bool {
        self.predictor.is_some()
    }
}
