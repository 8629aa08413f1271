//! The per-namespace enforcement object
//!
//! Every enforcement object the system manages carries a fixed well-known
//! name and an ownership label. The label is the load-bearing part: list
//! and delete operations must filter on it, never on the name alone, so a
//! user-created object that happens to share the name is never touched.

use crate::limits::ResolvedLimit;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known name of the enforcement object within each namespace
pub const ENFORCEMENT_NAME: &str = "default-limitrange";

/// Label key marking an object as managed by this system
pub const OWNER_LABEL_KEY: &str = "limitgate.dev/managed-by";

/// Label value marking an object as managed by this system
pub const OWNER_LABEL_VALUE: &str = "limitgate";

/// The namespace-scoped projection of a policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnforcementObject {
    /// Namespace this object lives in
    pub namespace: String,

    /// Object name; always [`ENFORCEMENT_NAME`] for managed objects
    pub name: String,

    /// Labels; managed objects carry the ownership marker
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Fully resolved limit entries, in policy rule order
    #[serde(default)]
    pub limits: Vec<ResolvedLimit>,
}

impl EnforcementObject {
    /// Build a system-owned enforcement object for a namespace
    ///
    /// Uses the well-known name and stamps the ownership marker.
    pub fn owned(namespace: impl Into<String>, limits: Vec<ResolvedLimit>) -> Self {
        let mut labels = BTreeMap::new();
        labels.insert(OWNER_LABEL_KEY.to_string(), OWNER_LABEL_VALUE.to_string());
        Self {
            namespace: namespace.into(),
            name: ENFORCEMENT_NAME.to_string(),
            labels,
            limits,
        }
    }

    /// Whether this object carries the ownership marker
    pub fn is_owned(&self) -> bool {
        self.labels.get(OWNER_LABEL_KEY).map(String::as_str) == Some(OWNER_LABEL_VALUE)
    }

    /// Identity within the store
    pub fn key(&self) -> (&str, &str) {
        (&self.namespace, &self.name)
    }

    /// Whether the enforced content equals another object's
    ///
    /// Compares the resolved limit lists only; labels and identity are
    /// not part of the enforced content.
    pub fn spec_matches(&self, other: &Self) -> bool {
        self.limits == other.limits
    }
}
