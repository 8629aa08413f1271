//! Idempotent object writes
//!
//! Thin wrapper over the store that gives the engine its two verbs:
//! `apply` (make this object exist with this content) and `remove` (make
//! it not exist). Both are safe under arbitrary retry and benign races:
//! "already exists" becomes an update, "not found" on delete is success.
//! Foreign objects occupying the well-known name are never overwritten.

use limitgate_model::{EnforcementObject, ENFORCEMENT_NAME};
use limitgate_store::{ObjectStore, StoreError};
use std::sync::Arc;
use tracing::{debug, warn};

/// What a write operation actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Object did not exist and was created
    Created,
    /// Object existed with different content and was replaced
    Updated,
    /// Object already matched the desired content; nothing written
    Unchanged,
    /// The well-known name is occupied by an object without the ownership
    /// marker; left untouched
    Conflict,
    /// Object existed and was deleted
    Deleted,
    /// Object was already gone
    AlreadyAbsent,
}

impl WriteOutcome {
    /// Whether the operation mutated the store
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            WriteOutcome::Created | WriteOutcome::Updated | WriteOutcome::Deleted
        )
    }
}

/// Create/update/delete wrapper with idempotent semantics
#[derive(Clone)]
pub struct ObjectWriter {
    store: Arc<dyn ObjectStore>,
}

impl ObjectWriter {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Ensure the desired object exists with the desired content
    pub async fn apply(&self, desired: EnforcementObject) -> Result<WriteOutcome, StoreError> {
        match self
            .store
            .get_enforcement(&desired.namespace, &desired.name)
            .await
        {
            Ok(existing) => self.reconcile_existing(existing, desired).await,
            Err(e) if e.is_not_found() => match self.store.create_enforcement(desired.clone()).await
            {
                Ok(()) => {
                    debug!(namespace = %desired.namespace, "created enforcement object");
                    Ok(WriteOutcome::Created)
                }
                Err(e) if e.is_already_exists() => {
                    // Benign race: another trigger created it between our
                    // get and create. Converge on top of what is there now.
                    let existing = self
                        .store
                        .get_enforcement(&desired.namespace, &desired.name)
                        .await?;
                    self.reconcile_existing(existing, desired).await
                }
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        }
    }

    /// Remove the managed object from a namespace
    pub async fn remove(&self, namespace: &str) -> Result<WriteOutcome, StoreError> {
        match self
            .store
            .delete_enforcement(namespace, ENFORCEMENT_NAME)
            .await
        {
            Ok(()) => Ok(WriteOutcome::Deleted),
            Err(e) if e.is_not_found() => Ok(WriteOutcome::AlreadyAbsent),
            Err(e) => Err(e),
        }
    }

    async fn reconcile_existing(
        &self,
        existing: EnforcementObject,
        desired: EnforcementObject,
    ) -> Result<WriteOutcome, StoreError> {
        if !existing.is_owned() {
            warn!(
                namespace = %desired.namespace,
                name = %desired.name,
                "enforcement name occupied by a foreign object; leaving it untouched"
            );
            return Ok(WriteOutcome::Conflict);
        }
        if existing.spec_matches(&desired) {
            return Ok(WriteOutcome::Unchanged);
        }
        self.store.update_enforcement(desired).await?;
        Ok(WriteOutcome::Updated)
    }
}
