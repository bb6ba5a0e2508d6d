// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Property-based tests for acl-admission.
//!
//! Uses proptest to generate random rules and limits and verify that the
//! CIDR limit is an inclusive upper bound.

use proptest::prelude::*;
use serde_json::json;

use acl_admission::crd::{Extension, Shoot, ShootSpec};
use acl_admission::{CidrLimit, FieldErrorType, ShootValidator};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Strategy for generating IPv4 CIDR strings.
fn any_cidr() -> impl Strategy<Value = String> {
    (any::<[u8; 4]>(), 0..=32u8)
        .prop_map(|(o, prefix)| format!("{}.{}.{}.{}/{}", o[0], o[1], o[2], o[3], prefix))
}

/// Strategy for generating arbitrary rule action and type strings.
fn any_rule_string() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("ALLOW".to_string()),
        Just("remote_ip".to_string()),
        ".*",
    ]
}

fn shoot(action: &str, rule_type: &str, cidrs: &[String]) -> Shoot {
    Shoot {
        metadata: ObjectMeta {
            name: Some("foo".to_string()),
            namespace: Some("garden-dev".to_string()),
            ..Default::default()
        },
        spec: ShootSpec {
            extensions: vec![Extension {
                r#type: "acl".to_string(),
                provider_config: Some(json!({
                    "rule": {"action": action, "type": rule_type, "cidrs": cidrs}
                })),
                ..Default::default()
            }],
        },
    }
}

proptest! {
    /// Counts at or below the limit pass on create and update, whatever the
    /// rule action and type.
    #[test]
    fn within_limit_accepted(
        cidrs in prop::collection::vec(any_cidr(), 0..20),
        headroom in 0usize..10,
        action in any_rule_string(),
        rule_type in any_rule_string(),
    ) {
        let validator = ShootValidator::new(CidrLimit::new(cidrs.len() + headroom));
        let new = shoot(&action, &rule_type, &cidrs);
        let old = shoot(&action, &rule_type, &[]);

        prop_assert!(validator.validate(&new, None).is_ok());
        prop_assert!(validator.validate(&new, Some(&old)).is_ok());
    }

    /// Counts above the limit fail with TooMany on the cidrs field.
    #[test]
    fn above_limit_rejected(
        cidrs in prop::collection::vec(any_cidr(), 1..20),
        action in any_rule_string(),
        rule_type in any_rule_string(),
    ) {
        let validator = ShootValidator::new(CidrLimit::new(cidrs.len() - 1));
        let new = shoot(&action, &rule_type, &cidrs);

        for old in [None, Some(&new)] {
            let errors = validator.validate(&new, old).unwrap_err();
            let err = errors.first().unwrap();
            prop_assert_eq!(errors.len(), 1);
            prop_assert_eq!(err.error_type, FieldErrorType::TooMany);
            prop_assert_eq!(err.field.as_str(), "spec.extensions.providerConfig.rule.cidrs");
            prop_assert_eq!(err.value.clone(), cidrs.len().to_string());
        }
    }

    /// Validation never depends on anything but the object and the limit.
    #[test]
    fn validation_deterministic(
        cidrs in prop::collection::vec(any_cidr(), 0..12),
        max in 0usize..12,
    ) {
        let validator = ShootValidator::new(CidrLimit::new(max));
        let new = shoot("ALLOW", "remote_ip", &cidrs);

        let first = validator.validate(&new, None);
        let second = validator.validate(&new, None);
        prop_assert_eq!(first, second);
    }
}
