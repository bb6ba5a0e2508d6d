//! Validation policies for the ACL provider configuration of a Shoot.
//!
//! Policies are organized into tiers:
//! - Tier 1 (Critical): CIDR count limit
//!
//! Rule action, rule type and the CIDR strings themselves are not inspected.

pub mod cidr_limit;

use crate::crd::AclExtensionConfig;
use crate::webhooks::field::{FieldError, FieldPath};

/// Context for validation
pub struct ValidationContext<'a> {
    /// The parsed ACL provider configuration
    pub config: &'a AclExtensionConfig,
    /// Maximum CIDR count in effect for this request
    pub max_cidrs: usize,
}

/// Path of the ACL extension's provider configuration.
///
/// Paths name the extensions list without an index.
pub fn provider_config_path() -> FieldPath {
    FieldPath::new("spec")
        .child("extensions")
        .child("providerConfig")
}

/// Path of the ACL rule inside the provider configuration.
pub fn rule_path() -> FieldPath {
    provider_config_path().child("rule")
}

/// Run all validation policies
pub fn validate_all(ctx: &ValidationContext<'_>) -> Vec<FieldError> {
    let mut errors = Vec::new();

    // Tier 1: Critical validations
    errors.extend(cidr_limit::validate(ctx));

    errors
}
