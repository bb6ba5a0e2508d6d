//! Admission webhook server.
//!
//! Provides the HTTPS endpoint Kubernetes calls for Shoot admission.
//!
//! To enable the webhook:
//! 1. Issue a serving certificate (e.g. with cert-manager)
//! 2. Create a ValidatingWebhookConfiguration for `core.gardener.cloud/v1beta1` shoots
//!    pointing at `/validate-shoot`
//! 3. Mount the TLS certificate secret at the configured cert/key paths

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use kube::Resource;
use kube::core::DynamicObject;
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::crd::Shoot;
use crate::error::{Error, Result};
use crate::health::HealthState;
use crate::webhooks::field::{FieldErrorList, FieldErrorType};
use crate::webhooks::validator::ShootValidator;

/// Shared state for webhook handlers
pub struct WebhookState {
    pub validator: ShootValidator,
    /// Metrics sink; admission decisions are not recorded when absent
    pub health: Option<Arc<HealthState>>,
}

impl WebhookState {
    pub fn new(validator: ShootValidator, health: Option<Arc<HealthState>>) -> Self {
        Self { validator, health }
    }

    fn record_allowed(&self, operation: &str) {
        if let Some(health) = &self.health {
            health.metrics.record_allowed(operation);
        }
    }

    fn record_denied(&self, operation: &str, reason: &str) {
        if let Some(health) = &self.health {
            health.metrics.record_denied(operation, reason);
        }
    }
}

/// Create a denial response with reason embedded in message.
/// kube-rs deny() only sets status.message, so we format as "[reason] message"
fn deny_with_reason<T: Resource<DynamicType = ()>>(
    request: &AdmissionRequest<T>,
    message: &str,
    reason: &str,
) -> AdmissionReview<DynamicObject> {
    let full_message = format!("[{}] {}", reason, message);
    AdmissionResponse::from(request)
        .deny(full_message)
        .into_review()
}

/// Denial reason for a set of field errors
///
/// Anything other than a CIDR limit violation is a missing or undecodable
/// provider config.
pub fn denial_reason(errors: &FieldErrorList) -> &'static str {
    if errors.contains_type(FieldErrorType::TooMany) {
        "TooManyCIDRs"
    } else {
        "InvalidProviderConfig"
    }
}

fn operation_label(operation: &Operation) -> &'static str {
    match operation {
        Operation::Create => "CREATE",
        Operation::Update => "UPDATE",
        Operation::Delete => "DELETE",
        Operation::Connect => "CONNECT",
    }
}

/// Create the webhook router
pub fn create_webhook_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route("/validate-shoot", post(validate_shoot))
        .with_state(state)
}

/// Shoot admission webhook handler
async fn validate_shoot(
    State(state): State<Arc<WebhookState>>,
    Json(review): Json<AdmissionReview<Shoot>>,
) -> impl IntoResponse {
    let (status, review) = review_shoot(&state, review);
    (status, Json(review))
}

/// Decide an admission review for a Shoot.
///
/// Returns the HTTP status to answer with and the review carrying the
/// admission response.
pub fn review_shoot(
    state: &WebhookState,
    review: AdmissionReview<Shoot>,
) -> (StatusCode, AdmissionReview<DynamicObject>) {
    let request: AdmissionRequest<Shoot> = match review.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(error = %e, "Failed to extract admission request");
            return (
                StatusCode::BAD_REQUEST,
                AdmissionResponse::invalid(format!("Invalid AdmissionReview: {}", e)).into_review(),
            );
        }
    };

    let uid = &request.uid;
    let operation = operation_label(&request.operation);
    debug!(
        uid = %uid,
        operation,
        namespace = ?request.namespace,
        name = %request.name,
        "Processing admission request"
    );

    // DELETE and CONNECT carry nothing to validate
    if matches!(request.operation, Operation::Delete | Operation::Connect) {
        info!(uid = %uid, operation, "Admission request allowed");
        state.record_allowed(operation);
        return (StatusCode::OK, AdmissionResponse::from(&request).into_review());
    }

    let Some(shoot) = request.object.as_ref() else {
        error!(uid = %uid, "Missing object in request");
        state.record_denied(operation, "InvalidRequest");
        return (
            StatusCode::OK,
            deny_with_reason(&request, "Missing object in request", "InvalidRequest"),
        );
    };

    if let Err(errors) = state.validator.validate(shoot, request.old_object.as_ref()) {
        let reason = denial_reason(&errors);
        let message = errors.to_string();
        warn!(
            uid = %uid,
            operation,
            namespace = ?request.namespace,
            name = %request.name,
            reason,
            message = %message,
            "Admission request denied"
        );
        state.record_denied(operation, reason);
        return (StatusCode::OK, deny_with_reason(&request, &message, reason));
    }

    info!(uid = %uid, operation, "Admission request allowed");
    state.record_allowed(operation);
    (StatusCode::OK, AdmissionResponse::from(&request).into_review())
}

/// Run the webhook server with TLS
///
/// Binds to 0.0.0.0 on `port` and serves the /validate-shoot endpoint.
/// TLS certificates are loaded from the paths specified. The health state
/// of `state`, if any, is marked ready only once they loaded.
pub async fn run_webhook_server(
    state: Arc<WebhookState>,
    port: u16,
    cert_path: &Path,
    key_path: &Path,
) -> Result<()> {
    use axum_server::tls_rustls::RustlsConfig;
    use std::net::SocketAddr;

    let health = state.health.clone();
    let app = create_webhook_router(state);

    let config = RustlsConfig::from_pem_file(cert_path, key_path)
        .await
        .map_err(|e| Error::TlsConfig(e.to_string()))?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let server = axum_server::bind_rustls(addr, config);

    if let Some(health) = &health {
        health.set_ready(true).await;
    }
    info!(port, "Webhook server listening with TLS");

    let result = server
        .serve(app.into_make_service())
        .await
        .map_err(|e| Error::Server(e.to_string()));

    if let Some(health) = &health {
        health.set_ready(false).await;
    }
    result
}
