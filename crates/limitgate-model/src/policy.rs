//! The cluster-scoped limit policy

use crate::limits::LimitRule;
use serde::{Deserialize, Serialize};

/// The cluster-scoped desired-state object
///
/// One policy drives enforcement for a deployment. The engine reads the
/// rule list and scope filters, and writes only `status`; everything else
/// is operator-owned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Unique identity, cluster-scoped
    pub name: String,

    /// Ordered limit rules; order is preserved into enforcement objects
    #[serde(default)]
    pub limits: Vec<LimitRule>,

    /// Namespaces in scope; empty means every namespace
    #[serde(rename = "includeNamespaces", default)]
    pub include_namespaces: Vec<String>,

    /// Namespaces excluded from scope; always wins over include
    #[serde(rename = "excludeNamespaces", default)]
    pub exclude_namespaces: Vec<String>,

    /// Observed state, advisory only; recomputed each pass, never trusted
    #[serde(default)]
    pub status: PolicyStatus,
}

impl Policy {
    /// A policy with the given name and no rules or filters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            limits: Vec::new(),
            include_namespaces: Vec::new(),
            exclude_namespaces: Vec::new(),
            status: PolicyStatus::default(),
        }
    }
}

/// Best-effort observed status of a policy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyStatus {
    /// Namespaces currently carrying an enforcement object, sorted
    #[serde(rename = "appliedNamespaces", default)]
    pub applied_namespaces: Vec<String>,
}
