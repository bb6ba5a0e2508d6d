//! Test fixtures and builder patterns for Shoot.

use acl_admission::crd::{Extension, Shoot, ShootSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde_json::json;

/// CIDRs used across the test suites.
pub const SAMPLE_CIDRS: [&str; 8] = [
    "1.2.3.4/24",
    "10.250.0.0/16",
    "208.127.57.6/32",
    "165.1.187.201/32",
    "165.1.187.202/32",
    "165.1.187.203/32",
    "165.1.187.207/32",
    "165.1.187.208/32",
];

/// Builder for creating Shoot test fixtures.
///
/// # Example
/// ```
/// let shoot = ShootBuilder::new("foo")
///     .namespace("garden-dev")
///     .acl_rule("ALLOW", "remote_ip", &["10.250.0.0/16"])
///     .build();
/// ```
#[derive(Clone, Debug)]
pub struct ShootBuilder {
    name: String,
    namespace: Option<String>,
    extensions: Vec<Extension>,
}

impl ShootBuilder {
    /// Create a new builder with the given Shoot name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            extensions: Vec::new(),
        }
    }

    /// Set the namespace (the Gardener project namespace).
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Add an ACL extension with the given rule.
    pub fn acl_rule(self, action: &str, rule_type: &str, cidrs: &[&str]) -> Self {
        self.raw_acl(json!({
            "rule": {"action": action, "type": rule_type, "cidrs": cidrs}
        }))
    }

    /// Add an ACL extension allowing `cidrs` for remote IPs.
    pub fn acl_cidrs(self, cidrs: &[&str]) -> Self {
        self.acl_rule("ALLOW", "remote_ip", cidrs)
    }

    /// Add an ACL extension with an arbitrary provider config.
    pub fn raw_acl(self, provider_config: serde_json::Value) -> Self {
        self.extension(Extension {
            r#type: "acl".to_string(),
            provider_config: Some(provider_config),
            ..Default::default()
        })
    }

    /// Add an extension entry.
    pub fn extension(mut self, extension: Extension) -> Self {
        self.extensions.push(extension);
        self
    }

    /// Build the Shoot.
    pub fn build(self) -> Shoot {
        Shoot {
            metadata: ObjectMeta {
                name: Some(self.name),
                namespace: self.namespace,
                ..Default::default()
            },
            spec: ShootSpec {
                extensions: self.extensions,
            },
        }
    }
}

impl Default for ShootBuilder {
    fn default() -> Self {
        Self::new("foo").namespace("garden-dev")
    }
}

/// Shoot with an ACL extension listing the first `count` sample CIDRs.
pub fn shoot_with_cidrs(count: usize) -> Shoot {
    let cidrs: Vec<&str> = SAMPLE_CIDRS.iter().copied().take(count).collect();
    ShootBuilder::default().acl_cidrs(&cidrs).build()
}
