//! Access policy configuration.
//!
//! ```toml
//! [record]
//! allow = ["validation_error"]
//! block = []
//!
//! [collection]
//! allow = []
//! ```
//!
//! Omitted tables and keys fall back to the built-in lists.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::ViewKind;
use crate::error::{ContextError, Result};
use crate::policy::{COLLECTION_ALLOW, RECORD_ALLOW};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub record: KindRules,

    #[serde(default)]
    pub collection: KindRules,
}

/// Allow and block entries for one structured-value kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KindRules {
    /// Internal members templates may read. Replaces the built-in list when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow: Option<Vec<String>>,

    /// Extra names to block on top of the base surface
    #[serde(default)]
    pub block: Vec<String>,
}

impl PolicyConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: PolicyConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn rules(&self, kind: ViewKind) -> &KindRules {
        match kind {
            ViewKind::Record => &self.record,
            ViewKind::Collection => &self.collection,
        }
    }

    /// The effective allow-list for `kind`.
    pub fn allowed(&self, kind: ViewKind) -> Vec<String> {
        match &self.rules(kind).allow {
            Some(allow) => allow.clone(),
            None => {
                let defaults = match kind {
                    ViewKind::Record => RECORD_ALLOW,
                    ViewKind::Collection => COLLECTION_ALLOW,
                };
                defaults.iter().map(|name| name.to_string()).collect()
            }
        }
    }

    /// Validate every configured name. A name may not be both allowed and
    /// blocked for the same kind.
    pub fn validate(&self) -> Result<()> {
        for kind in [ViewKind::Record, ViewKind::Collection] {
            let rules = self.rules(kind);
            let names = rules.allow.iter().flatten().chain(rules.block.iter());
            for name in names {
                if !is_member_name(name) {
                    return Err(ContextError::InvalidConfig(format!(
                        "invalid {} member name {:?}",
                        kind, name
                    )));
                }
            }
            if let Some(name) = self
                .allowed(kind)
                .into_iter()
                .find(|name| rules.block.contains(name))
            {
                return Err(ContextError::InvalidConfig(format!(
                    "{} member {:?} is both allowed and blocked",
                    kind, name
                )));
            }
        }
        Ok(())
    }
}

fn is_member_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(|c| c.is_whitespace() || c == '.' || c == '[' || c == ']')
}
