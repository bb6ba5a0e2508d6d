//! Health server for Kubernetes probes and Prometheus metrics.
//!
//! Provides:
//! - `/healthz` - Liveness probe (always returns 200 if server is running)
//! - `/readyz` - Readiness probe (returns 200 once the webhook server is up)
//! - `/metrics` - Prometheus metrics endpoint

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::{EncodeLabel, EncodeLabelSet, LabelSetEncoder};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::CidrLimit;

/// Labels for admission decision metrics
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct AdmissionLabels {
    pub operation: String,
    pub result: String,
}

impl EncodeLabelSet for AdmissionLabels {
    fn encode(&self, mut encoder: LabelSetEncoder<'_>) -> Result<(), std::fmt::Error> {
        ("operation", self.operation.as_str()).encode(encoder.encode_label())?;
        ("result", self.result.as_str()).encode(encoder.encode_label())?;
        Ok(())
    }
}

/// Labels for denial metrics
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct DenialLabels {
    pub reason: String,
}

impl EncodeLabelSet for DenialLabels {
    fn encode(&self, mut encoder: LabelSetEncoder<'_>) -> Result<(), std::fmt::Error> {
        ("reason", self.reason.as_str()).encode(encoder.encode_label())?;
        Ok(())
    }
}

/// Shared metrics for the webhook
pub struct Metrics {
    /// Admission requests by operation and result
    pub admission_requests_total: Family<AdmissionLabels, Counter>,
    /// Denied admission requests by reason
    pub admission_denials_total: Family<DenialLabels, Counter>,
    /// Maximum CIDR count currently enforced
    pub max_allowed_cidrs: Gauge,
    /// Limit the gauge is refreshed from on every encode
    cidr_limit: Option<CidrLimit>,
    /// Prometheus registry
    registry: Registry,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics instance with registered metrics
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let admission_requests_total = Family::<AdmissionLabels, Counter>::default();
        registry.register(
            "acl_admission_requests",
            "Total number of Shoot admission requests",
            admission_requests_total.clone(),
        );

        let admission_denials_total = Family::<DenialLabels, Counter>::default();
        registry.register(
            "acl_admission_denials",
            "Total number of denied Shoot admission requests",
            admission_denials_total.clone(),
        );

        let max_allowed_cidrs: Gauge = Gauge::default();
        registry.register(
            "acl_admission_max_allowed_cidrs",
            "Maximum number of CIDRs allowed in an ACL rule",
            max_allowed_cidrs.clone(),
        );

        Self {
            admission_requests_total,
            admission_denials_total,
            max_allowed_cidrs,
            cidr_limit: None,
            registry,
        }
    }

    /// Create a metrics instance that publishes the current value of `limit`
    pub fn with_cidr_limit(limit: CidrLimit) -> Self {
        Self {
            cidr_limit: Some(limit),
            ..Self::new()
        }
    }

    /// Record an allowed admission request
    pub fn record_allowed(&self, operation: &str) {
        let labels = AdmissionLabels {
            operation: operation.to_string(),
            result: "allowed".to_string(),
        };
        self.admission_requests_total.get_or_create(&labels).inc();
    }

    /// Record a denied admission request
    pub fn record_denied(&self, operation: &str, reason: &str) {
        let labels = AdmissionLabels {
            operation: operation.to_string(),
            result: "denied".to_string(),
        };
        self.admission_requests_total.get_or_create(&labels).inc();
        self.admission_denials_total
            .get_or_create(&DenialLabels {
                reason: reason.to_string(),
            })
            .inc();
    }

    /// Encode metrics to Prometheus text format
    pub fn encode(&self) -> String {
        if let Some(limit) = &self.cidr_limit {
            self.max_allowed_cidrs
                .set(i64::try_from(limit.get()).unwrap_or(i64::MAX));
        }

        let mut buffer = String::new();
        if encode(&mut buffer, &self.registry).is_err() {
            tracing::error!("Failed to encode metrics");
            return "# Error encoding metrics".to_string();
        }
        buffer
    }
}

/// Shared state for the health server
pub struct HealthState {
    /// Whether the webhook is ready to serve admission requests
    ready: RwLock<bool>,
    /// Metrics registry
    pub metrics: Metrics,
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthState {
    /// Create a new health state (starts as not ready)
    pub fn new() -> Self {
        Self {
            ready: RwLock::new(false),
            metrics: Metrics::new(),
        }
    }

    /// Create a health state whose metrics publish the enforced CIDR limit
    pub fn with_cidr_limit(limit: CidrLimit) -> Self {
        Self {
            ready: RwLock::new(false),
            metrics: Metrics::with_cidr_limit(limit),
        }
    }

    /// Mark the webhook as ready or not ready
    pub async fn set_ready(&self, ready: bool) {
        *self.ready.write().await = ready;
    }

    /// Check if the webhook is ready
    pub async fn is_ready(&self) -> bool {
        *self.ready.read().await
    }
}

/// Liveness probe handler
async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Readiness probe handler
///
/// Returns 503 Service Unavailable until the webhook server is started.
async fn readyz(State(state): State<Arc<HealthState>>) -> Response {
    if state.is_ready().await {
        (StatusCode::OK, "ready").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready").into_response()
    }
}

/// Metrics handler
async fn metrics_handler(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let body = state.metrics.encode();
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}

/// Create the health server router
pub fn create_router(state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Run the health server
///
/// Binds to 0.0.0.0 on the given port and serves health/metrics endpoints.
pub async fn run_health_server(state: Arc<HealthState>, port: u16) -> Result<(), std::io::Error> {
    let app = create_router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!(port, "Starting health server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
