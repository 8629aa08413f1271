//! In-memory object store
//!
//! Reference [`ObjectStore`] implementation backed by `RwLock`-guarded
//! maps. Used by the one-shot CLI modes and throughout the test suites.
//! Write operations are counted so idempotence ("a second pass performs
//! zero writes") is directly assertable.

use crate::error::{Result, StoreError};
use crate::ObjectStore;
use async_trait::async_trait;
use limitgate_model::{EnforcementObject, Policy, PolicyStatus};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory store state
#[derive(Default)]
struct Inner {
    namespaces: BTreeSet<String>,
    policies: HashMap<String, Policy>,
    enforcements: HashMap<(String, String), EnforcementObject>,
}

/// In-memory [`ObjectStore`] implementation
///
/// Cheap to clone; clones share the same state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,

    /// Count of mutating operations (create/update/delete/status)
    writes: Arc<AtomicU64>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a namespace without counting it as a write
    pub async fn seed_namespace(&self, name: impl Into<String>) {
        let mut inner = self.inner.write().await;
        inner.namespaces.insert(name.into());
    }

    /// Seed a policy without counting it as a write
    pub async fn seed_policy(&self, policy: Policy) {
        let mut inner = self.inner.write().await;
        inner.policies.insert(policy.name.clone(), policy);
    }

    /// Seed an enforcement object without counting it as a write
    ///
    /// Used to model pre-existing objects, including foreign ones.
    pub async fn seed_enforcement(&self, obj: EnforcementObject) {
        let mut inner = self.inner.write().await;
        inner
            .enforcements
            .insert((obj.namespace.clone(), obj.name.clone()), obj);
    }

    /// Remove a namespace, modelling a namespace deleted out-of-band
    ///
    /// Enforcement objects inside it are left in place so drift repair can
    /// be exercised.
    pub async fn remove_namespace(&self, name: &str) {
        let mut inner = self.inner.write().await;
        inner.namespaces.remove(name);
    }

    /// Remove a policy, modelling operator deletion
    pub async fn remove_policy(&self, name: &str) {
        let mut inner = self.inner.write().await;
        inner.policies.remove(name);
    }

    /// Number of mutating store operations performed so far
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_namespaces(&self) -> Result<Vec<String>> {
        let inner = self.inner.read().await;
        Ok(inner.namespaces.iter().cloned().collect())
    }

    async fn get_policy(&self, name: &str) -> Result<Policy> {
        let inner = self.inner.read().await;
        inner
            .policies
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::not_found("policy", name))
    }

    async fn update_policy_status(&self, name: &str, status: PolicyStatus) -> Result<()> {
        let mut inner = self.inner.write().await;
        let policy = inner
            .policies
            .get_mut(name)
            .ok_or_else(|| StoreError::not_found("policy", name))?;
        policy.status = status;
        drop(inner);
        self.record_write();
        Ok(())
    }

    async fn get_enforcement(&self, namespace: &str, name: &str) -> Result<EnforcementObject> {
        let inner = self.inner.read().await;
        inner
            .enforcements
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::not_found("enforcement", format!("{}/{}", namespace, name)))
    }

    async fn list_enforcements(
        &self,
        selector: Option<(&str, &str)>,
    ) -> Result<Vec<EnforcementObject>> {
        let inner = self.inner.read().await;
        let mut objects: Vec<EnforcementObject> = inner
            .enforcements
            .values()
            .filter(|obj| match selector {
                Some((key, value)) => obj.labels.get(key).map(String::as_str) == Some(value),
                None => true,
            })
            .cloned()
            .collect();
        // Deterministic order for callers and tests
        objects.sort_by(|a, b| a.key().cmp(&b.key()));
        Ok(objects)
    }

    async fn create_enforcement(&self, obj: EnforcementObject) -> Result<()> {
        let key = (obj.namespace.clone(), obj.name.clone());
        let mut inner = self.inner.write().await;
        if inner.enforcements.contains_key(&key) {
            return Err(StoreError::already_exists(
                "enforcement",
                format!("{}/{}", key.0, key.1),
            ));
        }
        debug!(namespace = %key.0, name = %key.1, "creating enforcement object");
        inner.enforcements.insert(key, obj);
        drop(inner);
        self.record_write();
        Ok(())
    }

    async fn update_enforcement(&self, obj: EnforcementObject) -> Result<()> {
        let key = (obj.namespace.clone(), obj.name.clone());
        let mut inner = self.inner.write().await;
        if !inner.enforcements.contains_key(&key) {
            return Err(StoreError::not_found(
                "enforcement",
                format!("{}/{}", key.0, key.1),
            ));
        }
        debug!(namespace = %key.0, name = %key.1, "updating enforcement object");
        inner.enforcements.insert(key, obj);
        drop(inner);
        self.record_write();
        Ok(())
    }

    async fn delete_enforcement(&self, namespace: &str, name: &str) -> Result<()> {
        let key = (namespace.to_string(), name.to_string());
        let mut inner = self.inner.write().await;
        if inner.enforcements.remove(&key).is_none() {
            return Err(StoreError::not_found(
                "enforcement",
                format!("{}/{}", namespace, name),
            ));
        }
        debug!(namespace = %namespace, name = %name, "deleted enforcement object");
        drop(inner);
        self.record_write();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use limitgate_model::{EnforcementObject, Policy, OWNER_LABEL_KEY, OWNER_LABEL_VALUE};

    fn owned(namespace: &str) -> EnforcementObject {
        EnforcementObject::owned(namespace, Vec::new())
    }

    #[tokio::test]
    async fn test_namespaces_sorted() {
        let store = MemoryStore::new();
        store.seed_namespace("zeta").await;
        store.seed_namespace("alpha").await;

        let names = store.list_namespaces().await.unwrap();
        assert_eq!(names, vec!["alpha".to_string(), "zeta".to_string()]);
    }

    #[tokio::test]
    async fn test_policy_not_found() {
        let store = MemoryStore::new();
        let err = store.get_policy("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_create_twice_is_already_exists() {
        let store = MemoryStore::new();
        store.create_enforcement(owned("team-a")).await.unwrap();

        let err = store.create_enforcement(owned("team-a")).await.unwrap_err();
        assert!(err.is_already_exists());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store.update_enforcement(owned("team-a")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .delete_enforcement("team-a", "default-limitrange")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_label_selector_filters() {
        let store = MemoryStore::new();
        store.seed_enforcement(owned("team-a")).await;

        // Foreign object with the same name, no marker
        let mut foreign = owned("team-b");
        foreign.labels.clear();
        store.seed_enforcement(foreign).await;

        let all = store.list_enforcements(None).await.unwrap();
        assert_eq!(all.len(), 2);

        let managed = store
            .list_enforcements(Some((OWNER_LABEL_KEY, OWNER_LABEL_VALUE)))
            .await
            .unwrap();
        assert_eq!(managed.len(), 1);
        assert_eq!(managed[0].namespace, "team-a");
    }

    #[tokio::test]
    async fn test_write_count_ignores_seeding() {
        let store = MemoryStore::new();
        store.seed_namespace("team-a").await;
        store.seed_policy(Policy::new("global-limits")).await;
        store.seed_enforcement(owned("team-a")).await;
        assert_eq!(store.write_count(), 0);

        store.create_enforcement(owned("team-b")).await.unwrap();
        store
            .delete_enforcement("team-b", "default-limitrange")
            .await
            .unwrap();
        assert_eq!(store.write_count(), 2);
    }
}
