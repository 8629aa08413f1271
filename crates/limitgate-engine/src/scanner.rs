//! Target-set computation
//!
//! The target set is re-derived from scratch on every pass, as a pure
//! function of (policy, live namespace set). No caching, no incremental
//! diffing; the recompute cost buys correctness under drift.

use crate::scope;
use limitgate_model::Policy;
use limitgate_store::{ObjectStore, Result};
use std::collections::BTreeSet;

/// Namespaces the policy currently applies to
///
/// Lists live namespaces from the store and filters them through the
/// policy's include/exclude lists. A failure to list namespaces is a
/// pass-level error; there is no meaningful partial answer.
pub async fn target_set(store: &dyn ObjectStore, policy: &Policy) -> Result<BTreeSet<String>> {
    let namespaces = store.list_namespaces().await?;
    Ok(namespaces
        .into_iter()
        .filter(|ns| {
            scope::in_scope(ns, &policy.include_namespaces, &policy.exclude_namespaces)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use limitgate_store::MemoryStore;

    #[tokio::test]
    async fn test_target_set_applies_filters() {
        let store = MemoryStore::new();
        for ns in ["a", "b", "kube-system"] {
            store.seed_namespace(ns).await;
        }

        let mut policy = Policy::new("global-limits");
        policy.exclude_namespaces = vec!["kube-system".to_string()];

        let targets = target_set(&store, &policy).await.unwrap();
        assert_eq!(
            targets.into_iter().collect::<Vec<_>>(),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[tokio::test]
    async fn test_target_set_with_include() {
        let store = MemoryStore::new();
        for ns in ["a", "b", "c"] {
            store.seed_namespace(ns).await;
        }

        let mut policy = Policy::new("global-limits");
        policy.include_namespaces = vec!["a".to_string(), "b".to_string()];
        policy.exclude_namespaces = vec!["b".to_string()];

        let targets = target_set(&store, &policy).await.unwrap();
        assert_eq!(targets.into_iter().collect::<Vec<_>>(), vec!["a".to_string()]);
    }
}
