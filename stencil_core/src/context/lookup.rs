use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use super::Context;
use crate::classify::{element_at, is_indexed_collection};
use crate::policy::{AccessPolicy, ACCESS_POLICY};
use crate::value::Value;

lazy_static! {
    // Canonical non-negative decimal index: no sign, no leading zeros.
    static ref INDEX: Regex = Regex::new(r"^(0|[1-9][0-9]*)$").unwrap();
}

/// Resolve `name` against the node's view under the process-wide policy.
///
/// `None` means "not found": absent, null, or blocked for templates.
pub fn resolve(node: &Context<'_>, name: &str) -> Option<Value> {
    resolve_with(&ACCESS_POLICY, node, name)
}

/// Resolve `name` against the node's view under `policy`.
///
/// Named fields of records and positional items of collections are read
/// without consulting the policy. Only the generic member fallback is
/// policed, and only for framework-tagged values.
pub fn resolve_with(policy: &AccessPolicy, node: &Context<'_>, name: &str) -> Option<Value> {
    let view = node.view();

    if let Value::Record(record) = view {
        if record.has(name) {
            return record.get(name);
        }
    }

    if is_indexed_collection(view) && INDEX.is_match(name) {
        // Indices too large for usize are out of range for any collection.
        return name.parse::<usize>().ok().and_then(|index| element_at(view, index));
    }

    if !view.is_object_like() {
        return None;
    }
    let value = view.member(name)?;
    if let Some(kind) = view.kind() {
        if policy.is_blocked(kind, name) {
            trace!(%kind, name, "Blocked template access to internal member");
            return None;
        }
    }
    Some(value)
}
