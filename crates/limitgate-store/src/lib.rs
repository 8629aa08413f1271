//! Limitgate Store: the object-store boundary
//!
//! This crate defines the [`ObjectStore`] trait, the single seam between
//! the convergence engine and whatever actually persists policies and
//! enforcement objects. The engine only ever sees this trait; the backing
//! system (an API server, a database, the in-memory [`MemoryStore`]) is a
//! deployment concern.
//!
//! # Error classification
//!
//! The engine's behaviour hinges on classifying store failures, so
//! [`StoreError`] keeps "not found" and "already exists" as first-class
//! variants with predicates. Everything else is transient and retried on
//! the next trigger.
//!
//! # Example
//!
//! ```rust,no_run
//! use limitgate_store::{MemoryStore, ObjectStore};
//!
//! # async fn example() -> limitgate_store::Result<()> {
//! let store = MemoryStore::new();
//! store.seed_namespace("team-a").await;
//!
//! let namespaces = store.list_namespaces().await?;
//! assert_eq!(namespaces, vec!["team-a".to_string()]);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod memory;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;

use async_trait::async_trait;
use limitgate_model::{EnforcementObject, Policy, PolicyStatus};

/// The declarative object-store boundary
///
/// All operations are safe to call redundantly; idempotence at the engine
/// level is built on that guarantee. Implementations must be
/// `Send + Sync + 'static` to work across async task boundaries.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// List the names of all namespaces currently in the cluster
    async fn list_namespaces(&self) -> Result<Vec<String>>;

    /// Fetch a policy by name
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the policy does not exist;
    /// the engine treats that as "run the cleanup sweep".
    async fn get_policy(&self, name: &str) -> Result<Policy>;

    /// Replace a policy's status subresource
    ///
    /// Best-effort from the engine's point of view; the policy's limit
    /// rules are never written by this system.
    async fn update_policy_status(&self, name: &str, status: PolicyStatus) -> Result<()>;

    /// Fetch one enforcement object by namespace and name
    async fn get_enforcement(&self, namespace: &str, name: &str) -> Result<EnforcementObject>;

    /// List enforcement objects across all namespaces
    ///
    /// `selector` filters on an exact label key/value pair. The engine
    /// always passes the ownership marker here; name-only matching is not
    /// part of the contract.
    async fn list_enforcements(
        &self,
        selector: Option<(&str, &str)>,
    ) -> Result<Vec<EnforcementObject>>;

    /// Create an enforcement object
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] when the (namespace, name)
    /// slot is occupied; the caller converts that into an update.
    async fn create_enforcement(&self, obj: EnforcementObject) -> Result<()>;

    /// Replace an existing enforcement object
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when there is nothing to replace.
    async fn update_enforcement(&self, obj: EnforcementObject) -> Result<()>;

    /// Delete an enforcement object
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when it was already gone; callers
    /// treat that as success (already converged).
    async fn delete_enforcement(&self, namespace: &str, name: &str) -> Result<()>;
}
