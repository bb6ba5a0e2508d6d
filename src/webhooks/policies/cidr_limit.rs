//! CIDR count validation policy.
//!
//! Tier 1 (Critical): Always enforced
//!
//! The ACL extension renders every CIDR into the cluster's Envoy filter
//! configuration, so the number of entries is capped. The bound is inclusive.

use super::{ValidationContext, rule_path};
use crate::webhooks::field::FieldError;

/// Validate the number of CIDRs in the ACL rule
pub fn validate(ctx: &ValidationContext<'_>) -> Option<FieldError> {
    let count = ctx.config.rule.cidr_count();

    if count > ctx.max_cidrs {
        return Some(FieldError::too_many(
            &rule_path().child("cidrs"),
            count,
            ctx.max_cidrs,
        ));
    }

    None
}
