//! The convergence pass
//!
//! One pass takes a policy from desired state to enforced state: project
//! the limits once, re-derive the target namespace set, fan out one task
//! per namespace to create/update the enforcement object there, and prune
//! owned objects that fell out of scope. Per-namespace failures are
//! recorded and the pass continues: fail-open per namespace, so one bad
//! namespace never starves the rest of the cluster.

use crate::metrics::{PassStats, PassStatsBuilder};
use crate::writer::{ObjectWriter, WriteOutcome};
use crate::{projector, scanner, EngineError};
use limitgate_model::{EnforcementObject, Policy, PolicyStatus, OWNER_LABEL_KEY, OWNER_LABEL_VALUE};
use limitgate_store::{ObjectStore, StoreError};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Orchestrates convergence passes for a policy
pub struct ConvergenceEngine {
    store: Arc<dyn ObjectStore>,
    writer: ObjectWriter,

    /// Cap on concurrent per-namespace operations
    max_parallel: usize,
}

impl ConvergenceEngine {
    pub fn new(store: Arc<dyn ObjectStore>, max_parallel: usize) -> Self {
        let writer = ObjectWriter::new(store.clone());
        Self {
            store,
            writer,
            max_parallel,
        }
    }

    /// Execute one convergence pass for the given policy
    ///
    /// Pass-level errors (projection failure, namespace list failure)
    /// abort before anything is written. Everything past that point is
    /// per-namespace and fail-open.
    pub async fn converge(&self, policy: &Policy) -> Result<PassStats, EngineError> {
        info!(policy = %policy.name, "starting convergence pass");

        // Project once up front; a malformed quantity means nothing is
        // written anywhere this pass.
        let resolved = projector::project(&policy.limits)?;

        let targets = scanner::target_set(self.store.as_ref(), policy).await?;
        debug!(policy = %policy.name, targets = targets.len(), "computed target set");

        // Owned objects outside the target set are stale: their namespace
        // left scope or the policy narrowed its filters.
        let owned = self
            .store
            .list_enforcements(Some((OWNER_LABEL_KEY, OWNER_LABEL_VALUE)))
            .await?;
        let stale: Vec<String> = owned
            .iter()
            .filter(|obj| !targets.contains(&obj.namespace))
            .map(|obj| obj.namespace.clone())
            .collect();

        let semaphore = Arc::new(Semaphore::new(self.max_parallel));
        let mut tasks: JoinSet<(String, Result<WriteOutcome, StoreError>)> = JoinSet::new();

        for namespace in &targets {
            let writer = self.writer.clone();
            let desired = EnforcementObject::owned(namespace.clone(), resolved.clone());
            let semaphore = semaphore.clone();
            let namespace = namespace.clone();
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
                let result = writer.apply(desired).await;
                (namespace, result)
            });
        }

        for namespace in stale {
            let writer = self.writer.clone();
            let semaphore = semaphore.clone();
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
                Ok((namespace, Ok(outcome))) => {
                    if outcome == WriteOutcome::Conflict {
                        warn!(namespace = %namespace, "ownership conflict; object left untouched");
                    }
                    builder.record(outcome);
                }
                Ok((namespace, Err(e))) => {
                    warn!(namespace = %namespace, error = %e, "namespace operation failed; pass continues");
                    builder.record_failure(namespace, e);
                }
                Err(join_err) => {
                    // A panicked or cancelled task; surface it like any
                    // other namespace failure.
                    warn!(error = %join_err, "namespace task did not complete");
                    builder.record_failure("(task)", join_err);
                }
            }
        }

        self.update_status(policy, &targets).await;

        let stats = builder.finish();
        info!(policy = %policy.name, "{}", stats.summary());
        Ok(stats)
    }

    /// Best-effort status update; failure is logged, never fatal
    async fn update_status(&self, policy: &Policy, targets: &std::collections::BTreeSet<String>) {
        let applied: Vec<String> = targets.iter().cloned().collect();
        if policy.status.applied_namespaces == applied {
            return;
        }
        let status = PolicyStatus {
            applied_namespaces: applied,
        };
        if let Err(e) = self.store.update_policy_status(&policy.name, status).await {
            warn!(policy = %policy.name, error = %e, "failed to update policy status");
        }
    }
}
