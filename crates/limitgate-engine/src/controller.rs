//! Controller: the trigger boundary
//!
//! The controller is the single entry point external triggers call. Each
//! [`Controller::reconcile`] invocation fetches the configured policy and
//! dispatches: policy present means a convergence pass, policy gone means
//! a cleanup sweep. [`Controller::run`] adds the built-in periodic resync
//! trigger that heals drift (an enforcement object deleted out-of-band is
//! recreated on the next tick).

use crate::cleanup::CleanupEngine;
use crate::converge::ConvergenceEngine;
use crate::metrics::PassStats;
use crate::EngineError;
use limitgate_store::ObjectStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{error, info};

/// Operational settings for the controller
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// Name of the singleton policy this controller enforces
    ///
    /// Other policies in the store are ignored; see DESIGN.md for the
    /// singleton decision.
    pub policy_name: String,

    /// How often the periodic resync trigger fires
    ///
    /// Shorter intervals trade freshness for store load.
    ///
    /// **Default:** 30 minutes
    pub resync_interval: Duration,

    /// Cap on concurrent per-namespace operations within a pass
    ///
    /// **Default:** 16
    pub max_parallel: usize,

    /// Upper bound on a single pass; a timed-out pass is abandoned and the
    /// next trigger repairs whatever it left half-applied
    ///
    /// **Default:** 60 seconds
    pub pass_timeout: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            policy_name: "global-limits".to_string(),
            resync_interval: Duration::from_secs(30 * 60),
            max_parallel: 16,
            pass_timeout: Duration::from_secs(60),
        }
    }
}

impl ControllerSettings {
    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        if self.policy_name.is_empty() {
            return Err("policy_name must not be empty".to_string());
        }
        if self.resync_interval.is_zero() {
            return Err("resync_interval must be greater than zero".to_string());
        }
        if self.max_parallel == 0 {
            return Err("max_parallel must be at least 1".to_string());
        }
        if self.pass_timeout.is_zero() {
            return Err("pass_timeout must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// What a reconcile invocation did
#[derive(Debug, Clone)]
pub enum ReconcileOutcome {
    /// Policy exists; a convergence pass ran
    Converged(PassStats),
    /// Policy is gone; a cleanup sweep ran
    CleanedUp(PassStats),
}

impl ReconcileOutcome {
    /// The underlying pass statistics
    pub fn stats(&self) -> &PassStats {
        match self {
            ReconcileOutcome::Converged(stats) | ReconcileOutcome::CleanedUp(stats) => stats,
        }
    }
}

/// The reconciliation entry point
pub struct Controller {
    store: Arc<dyn ObjectStore>,
    engine: ConvergenceEngine,
    cleanup: CleanupEngine,
    settings: ControllerSettings,
}

impl Controller {
    /// Create a controller over a store
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSettings`] when the settings fail
    /// validation.
    pub fn new(
        store: Arc<dyn ObjectStore>,
        settings: ControllerSettings,
    ) -> Result<Self, EngineError> {
        settings.validate().map_err(EngineError::InvalidSettings)?;
        let engine = ConvergenceEngine::new(store.clone(), settings.max_parallel);
        let cleanup = CleanupEngine::new(store.clone(), settings.max_parallel);
        Ok(Self {
            store,
            engine,
            cleanup,
            settings,
        })
    }

    /// The settings this controller runs with
    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Run one reconciliation: converge if the policy exists, clean up if
    /// it does not
    ///
    /// Safe to call from overlapping triggers; convergence is idempotent,
    /// so concurrent passes duplicate effort but never state. The whole
    /// pass is bounded by `pass_timeout`; a half-applied pass is repaired
    /// by the next trigger.
    pub async fn reconcile(&self) -> Result<ReconcileOutcome, EngineError> {
        let bounded = timeout(self.settings.pass_timeout, self.reconcile_inner());
        match bounded.await {
            Ok(result) => result,
            Err(_) => Err(EngineError::Timeout(self.settings.pass_timeout)),
        }
    }

    async fn reconcile_inner(&self) -> Result<ReconcileOutcome, EngineError> {
        match self.store.get_policy(&self.settings.policy_name).await {
            Ok(policy) => {
                let stats = self.engine.converge(&policy).await?;
                Ok(ReconcileOutcome::Converged(stats))
            }
            Err(e) if e.is_not_found() => {
                info!(
                    policy = %self.settings.policy_name,
                    "policy not found; cleaning up owned enforcement objects"
                );
                let stats = self.cleanup.cleanup().await?;
                Ok(ReconcileOutcome::CleanedUp(stats))
            }
            Err(e) => Err(EngineError::Store(e)),
        }
    }

    /// Periodic resync loop
    ///
    /// Ticks immediately on startup, then every `resync_interval`. A
    /// failed pass is logged and retried on the next tick; no failure
    /// halts the loop. Returns when the shutdown channel flips to `true`
    /// or its sender is dropped.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            policy = %self.settings.policy_name,
            interval_s = self.settings.resync_interval.as_secs(),
            max_parallel = self.settings.max_parallel,
            "controller active"
        );

        let mut interval = tokio::time::interval(self.settings.resync_interval);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match self.reconcile().await {
                        Ok(outcome) => info!("resync pass done: {}", outcome.stats().summary()),
                        Err(e) => error!(error = %e, "resync pass failed; will retry on next trigger"),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("controller shutting down");
                        return;
                    }
                }
            }
        }
    }
}
