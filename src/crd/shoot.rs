//! Shoot Custom Resource Definition.
//!
//! Only the parts of the Gardener `Shoot` the webhook reads are modelled.
//! Unknown spec fields are ignored on decode.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ACL_EXTENSION_TYPE;

/// Shoot is a Gardener-managed Kubernetes cluster.
///
/// Example:
/// ```yaml
/// apiVersion: core.gardener.cloud/v1beta1
/// kind: Shoot
/// metadata:
///   name: foo
///   namespace: garden-dev
/// spec:
///   extensions:
///     - type: acl
///       providerConfig:
///         rule:
///           action: ALLOW
///           type: remote_ip
///           cidrs:
///             - 10.250.0.0/16
/// ```
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "core.gardener.cloud",
    version = "v1beta1",
    kind = "Shoot",
    plural = "shoots",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct ShootSpec {
    /// Extensions enabled for this cluster, in declaration order.
    #[serde(default)]
    pub extensions: Vec<Extension>,
}

/// An extension attached to a Shoot.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    /// Registered extension type, e.g. `acl`.
    pub r#type: String,

    /// Extension-specific configuration, opaque to Gardener.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_config: Option<serde_json::Value>,

    /// Whether the extension is disabled for this cluster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}

impl Shoot {
    /// First extension entry of type `acl`, if any.
    pub fn acl_extension(&self) -> Option<&Extension> {
        self.spec
            .extensions
            .iter()
            .find(|ext| ext.r#type == ACL_EXTENSION_TYPE)
    }
}
