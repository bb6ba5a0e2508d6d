//! Shoot validator for the ACL extension.
//!
//! Locates the ACL extension of a Shoot, decodes its provider configuration
//! and runs the validation policies against it. The validator is a pure
//! decision function: it never logs, never mutates its input and performs
//! no I/O.

use serde::Deserialize;

use crate::config::CidrLimit;
use crate::crd::{AclExtensionConfig, Extension, Shoot};
use crate::webhooks::field::{FieldError, FieldErrorList};
use crate::webhooks::policies::{ValidationContext, provider_config_path, validate_all};

/// Validates Shoots against the ACL extension's constraints.
#[derive(Clone, Debug)]
pub struct ShootValidator {
    max_cidrs: CidrLimit,
}

impl ShootValidator {
    pub fn new(max_cidrs: CidrLimit) -> Self {
        Self { max_cidrs }
    }

    /// The limit handle this validator reads on every call.
    pub fn cidr_limit(&self) -> &CidrLimit {
        &self.max_cidrs
    }

    /// Validate a Shoot on CREATE (`old` is `None`) or UPDATE.
    ///
    /// The old object is not consulted: the new object is always validated
    /// in full. A Shoot without an ACL extension is always accepted.
    pub fn validate(&self, shoot: &Shoot, _old: Option<&Shoot>) -> Result<(), FieldErrorList> {
        let Some(extension) = shoot.acl_extension() else {
            return Ok(());
        };

        let config = parse_provider_config(extension)?;
        let ctx = ValidationContext {
            config: &config,
            max_cidrs: self.max_cidrs.get(),
        };

        FieldErrorList::from(validate_all(&ctx)).into_result()
    }
}

/// Decode the ACL provider configuration of an extension entry.
fn parse_provider_config(extension: &Extension) -> Result<AclExtensionConfig, FieldError> {
    let path = provider_config_path();

    let Some(raw) = extension.provider_config.as_ref() else {
        return Err(FieldError::required(
            &path,
            "the acl extension requires a providerConfig",
        ));
    };

    AclExtensionConfig::deserialize(raw)
        .map_err(|e| FieldError::invalid(&path, &raw.to_string(), &e.to_string()))
}
