//! Default-deny access policy for framework values.
//!
//! For each structured-value kind the policy holds the set of member names a
//! template may not read through generic property access. The set is every
//! member of the kind's base surface minus an explicit allow-list, plus the
//! kind's raw storage field, which is blocked even when allow-listed.


use std::collections::HashSet;

use lazy_static::lazy_static;
use tracing::debug;

use crate::classify::ViewKind;
use crate::config::PolicyConfig;
use crate::data::{Collection, Model};

/// Internal record members that are safe to expose to templates.
pub const RECORD_ALLOW: &[&str] = &["validation_error"];

/// Internal collection members that are safe to expose to templates.
pub const COLLECTION_ALLOW: &[&str] = &[];

lazy_static! {
    /// The process-wide policy, built from the built-in lists on first use
    /// and read-only afterwards.
    pub static ref ACCESS_POLICY: AccessPolicy = AccessPolicy::default();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    record: HashSet<String>,
    collection: HashSet<String>,
}

impl AccessPolicy {
    pub fn from_config(config: &PolicyConfig) -> Self {
        let record = build_blocked(
            Model::BASE_SURFACE,
            Model::RAW_STORAGE,
            &config.allowed(ViewKind::Record),
            &config.record.block,
        );
        let collection = build_blocked(
            Collection::BASE_SURFACE,
            Collection::RAW_STORAGE,
            &config.allowed(ViewKind::Collection),
            &config.collection.block,
        );
        debug!(
            record = record.len(),
            collection = collection.len(),
            "Built access policy"
        );
        Self { record, collection }
    }

    /// Whether templates are denied generic access to `name` on a `kind` value.
    pub fn is_blocked(&self, kind: ViewKind, name: &str) -> bool {
        self.table(kind).contains(name)
    }

    /// Blocked names for `kind`, sorted.
    pub fn blocked_names(&self, kind: ViewKind) -> Vec<&str> {
        let mut names: Vec<&str> = self.table(kind).iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn table(&self, kind: ViewKind) -> &HashSet<String> {
        match kind {
            ViewKind::Record => &self.record,
            ViewKind::Collection => &self.collection,
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::from_config(&PolicyConfig::default())
    }
}

/// Shorthand for [`AccessPolicy::is_blocked`] on the process-wide policy.
pub fn is_blocked(kind: ViewKind, name: &str) -> bool {
    ACCESS_POLICY.is_blocked(kind, name)
}

fn build_blocked(
    surface: &[&[&str]],
    raw_storage: &str,
    allow: &[String],
    extra: &[String],
) -> HashSet<String> {
    let allowed: HashSet<&str> = allow.iter().map(String::as_str).collect();

    let mut blocked: HashSet<String> = surface
        .iter()
        .flat_map(|layer| layer.iter())
        .filter(|name| !allowed.contains(*name))
        .map(|name| name.to_string())
        .collect();

    blocked.extend(extra.iter().filter(|name| !allowed.contains(name.as_str())).cloned());
    // Raw storage bypasses per-field access entirely; no allow entry can lift it.
    blocked.insert(raw_storage.to_string());
    blocked
}
