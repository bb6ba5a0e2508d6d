//! Provider configuration of the ACL extension.
//!
//! Embedded in `Shoot.spec.extensions[].providerConfig` as:
//! ```json
//! {"rule": {"action": "ALLOW", "type": "remote_ip", "cidrs": ["10.250.0.0/16"]}}
//! ```

use serde::{Deserialize, Serialize};

/// Extension type the ACL extension is registered under.
pub const ACL_EXTENSION_TYPE: &str = "acl";

/// Top-level ACL provider configuration.
///
/// A payload without a `rule` decodes to an empty rule.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct AclExtensionConfig {
    #[serde(default)]
    pub rule: AclRule,
}

/// A single access rule applied to the cluster's endpoints.
///
/// `action` and `type` are carried through as-is; the webhook only limits
/// the number of CIDRs.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct AclRule {
    #[serde(default)]
    pub action: String,

    #[serde(default)]
    pub r#type: String,

    /// Network prefixes the rule matches. Duplicates are allowed.
    #[serde(default)]
    pub cidrs: Vec<String>,
}

impl AclRule {
    /// Number of CIDR entries, duplicates included.
    pub fn cidr_count(&self) -> usize {
        self.cidrs.len()
    }
}
