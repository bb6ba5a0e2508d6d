//! Webhook module for validating Shoot admission requests.
//!
//! The [`ShootValidator`] decides; the server adapts it to the Kubernetes
//! admission protocol. Policies are tiered:
//! - Tier 1 (Critical): CIDR count limit
//! - Tier 2 (Shape): rule action and rule type

pub mod field;
pub mod policies;
mod server;
pub mod validator;

pub use field::{FieldError, FieldErrorList, FieldErrorType, FieldPath};
pub use policies::ValidationContext;
pub use server::{WebhookState, create_webhook_router, denial_reason, review_shoot, run_webhook_server};
pub use validator::ShootValidator;

// Re-export kube-rs admission types for contract testing
pub use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
