//! Resource definitions consumed by the ACL admission webhook.
//!
//! - `Shoot`: the Gardener cluster resource admitted by the webhook
//! - `AclExtensionConfig`: the ACL extension's provider configuration

mod acl_config;
mod shoot;

pub use acl_config::*;
pub use shoot::*;
