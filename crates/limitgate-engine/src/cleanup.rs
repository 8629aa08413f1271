//! The cleanup sweep
//!
//! Runs when the policy no longer exists. Finds every object bearing the
//! ownership marker (across all namespaces, not scoped to any target set,
//! since a deleted policy's prior targets may have drifted) and deletes
//! each. Per-object failures are recorded, never retried in-loop; the next
//! periodic trigger retries them.

use crate::metrics::{PassStats, PassStatsBuilder};
use crate::writer::{ObjectWriter, WriteOutcome};
use crate::EngineError;
use limitgate_store::{ObjectStore, StoreError};
use limitgate_model::{OWNER_LABEL_KEY, OWNER_LABEL_VALUE};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Removes every owned enforcement object when the policy is gone
pub struct CleanupEngine {
    store: Arc<dyn ObjectStore>,
    writer: ObjectWriter,
    max_parallel: usize,
}

impl CleanupEngine {
    pub fn new(store: Arc<dyn ObjectStore>, max_parallel: usize) -> Self {
        let writer = ObjectWriter::new(store.clone());
        Self {
            store,
            writer,
            max_parallel,
        }
    }

    /// Sweep away all owned enforcement objects
    ///
    /// Always runs to completion; individual deletion failures are surfaced
    /// in the returned stats, not as an error. Only the initial marker list
    /// failing is pass-level.
    pub async fn cleanup(&self) -> Result<PassStats, EngineError> {
        info!("starting cleanup sweep");

        // Ownership marker is the mandatory filter; matching by name alone
        // would delete user-owned objects that share it.
        let owned = self
            .store
            .list_enforcements(Some((OWNER_LABEL_KEY, OWNER_LABEL_VALUE)))
            .await?;

        let semaphore = Arc::new(Semaphore::new(self.max_parallel));
        let mut tasks: JoinSet<(String, Result<WriteOutcome, StoreError>)> = JoinSet::new();

        for obj in owned {
            let writer = self.writer.clone();
            let semaphore = semaphore.clone();
            let namespace = obj.namespace;
            tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return (
                            namespace,
                            Err(StoreError::Transient("concurrency limiter closed".into())),
                        )
                    }
                };
                let result = writer.remove(&namespace).await;
                (namespace, result)
            });
        }

        let mut builder = PassStatsBuilder::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(outcome))) => builder.record(outcome),
                Ok((namespace, Err(e))) => {
                    warn!(namespace = %namespace, error = %e, "cleanup deletion failed; sweep continues");
                    builder.record_failure(namespace, e);
                }
                Err(join_err) => {
                    warn!(error = %join_err, "cleanup task did not complete");
                    builder.record_failure("(task)", join_err);
                }
            }
        }

        let stats = builder.finish();
        info!("{}", stats.summary());
        Ok(stats)
    }
}
