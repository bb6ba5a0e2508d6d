//! acl-admission library crate
//!
//! Admission webhook for the Gardener ACL extension. It rejects Shoots whose
//! ACL extension configuration lists more CIDRs than the configured maximum.
//!
//! This module exports the validator, resource definitions, configuration
//! and the webhook and health servers.

pub mod config;
pub mod crd;
pub mod error;
pub mod health;
pub mod webhooks;

pub use config::{CidrLimit, Config};
pub use error::{Error, Result};
pub use health::HealthState;
pub use webhooks::{FieldError, FieldErrorList, FieldErrorType, ShootValidator, run_webhook_server};
