/*!
 * Declarative cluster-state files
 *
 * A cluster-state file describes namespaces, the policy, and any
 * pre-existing enforcement objects in TOML. It seeds a `MemoryStore` for
 * one-shot CLI runs and demos; a real deployment points the engine at an
 * actual object store instead.
 *
 * ```toml
 * namespaces = ["team-a", "team-b", "kube-system"]
 *
 * [policy]
 * name = "global-limits"
 * excludeNamespaces = ["kube-system"]
 *
 * [[policy.limits]]
 * type = "Container"
 * [policy.limits.default]
 * cpu = "500m"
 * memory = "512Mi"
 * ```
 */

use crate::error::{LimitgateError, Result};
use limitgate_model::{EnforcementObject, Policy};
use limitgate_store::MemoryStore;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Declarative description of a cluster's relevant state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterState {
    /// Live namespace names
    #[serde(default)]
    pub namespaces: Vec<String>,

    /// The policy, if one exists
    #[serde(default)]
    pub policy: Option<Policy>,

    /// Pre-existing enforcement objects (owned or foreign)
    #[serde(default)]
    pub enforcements: Vec<EnforcementObject>,
}

impl ClusterState {
    /// Load a cluster-state file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| LimitgateError::State {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        toml::from_str(&contents).map_err(|e| LimitgateError::State {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Seed a fresh in-memory store with this state
    pub async fn into_store(self) -> MemoryStore {
        let store = MemoryStore::new();
        for ns in self.namespaces {
            store.seed_namespace(ns).await;
        }
        if let Some(policy) = self.policy {
            store.seed_policy(policy).await;
        }
        for obj in self.enforcements {
            store.seed_enforcement(obj).await;
        }
        store
    }
}
