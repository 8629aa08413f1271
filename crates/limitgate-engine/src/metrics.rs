//! Pass statistics
//!
//! Tracks what a convergence or cleanup pass actually did, for logging and
//! for the CLI's machine-readable output.

use crate::writer::WriteOutcome;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// One namespace's failure within an otherwise fail-open pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceFailure {
    pub namespace: String,
    pub error: String,
}

/// Statistics from a single pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PassStats {
    /// Enforcement objects created
    pub created: usize,

    /// Enforcement objects updated in place
    pub updated: usize,

    /// Namespaces already converged; nothing written
    pub unchanged: usize,

    /// Owned objects deleted (namespace left scope, or cleanup sweep)
    pub deleted: usize,

    /// Objects already absent when a delete was attempted
    pub already_absent: usize,

    /// Foreign objects occupying the well-known name, left untouched
    pub conflicts: usize,

    /// Namespaces whose operation failed this pass
    pub failed: usize,

    /// Details of the per-namespace failures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<NamespaceFailure>,

    /// Time taken to complete the pass
    pub duration: Option<Duration>,
}

impl PassStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store mutations this pass performed
    pub fn writes(&self) -> usize {
        self.created + self.updated + self.deleted
    }

    /// Total namespaces touched by the pass
    pub fn total(&self) -> usize {
        self.created + self.updated + self.unchanged + self.deleted + self.already_absent
            + self.conflicts
            + self.failed
    }

    /// Whether the pass completed without failures or conflicts
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.conflicts == 0
    }

    /// Format a human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Pass: {} namespaces | {} created | {} updated | {} unchanged | {} deleted | {} conflicts | {} failed",
            self.total(),
            self.created,
            self.updated,
            self.unchanged,
            self.deleted,
            self.conflicts,
            self.failed
        )
    }
}

/// Accumulates stats while a pass is running
#[derive(Debug)]
pub struct PassStatsBuilder {
    stats: PassStats,
    start_time: Instant,
}

impl PassStatsBuilder {
    /// Start tracking a new pass
    pub fn new() -> Self {
        Self {
            stats: PassStats::new(),
            start_time: Instant::now(),
        }
    }

    /// Record a completed write outcome
    pub fn record(&mut self, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Created => self.stats.created += 1,
            WriteOutcome::Updated => self.stats.updated += 1,
            WriteOutcome::Unchanged => self.stats.unchanged += 1,
            WriteOutcome::Deleted => self.stats.deleted += 1,
            WriteOutcome::AlreadyAbsent => self.stats.already_absent += 1,
            WriteOutcome::Conflict => self.stats.conflicts += 1,
        }
    }

    /// Record a failed namespace
    pub fn record_failure(&mut self, namespace: impl Into<String>, error: impl ToString) {
        self.stats.failed += 1;
        self.stats.failures.push(NamespaceFailure {
            namespace: namespace.into(),
            error: error.to_string(),
        });
    }

    /// Finalize and return the stats
    pub fn finish(mut self) -> PassStats {
        self.stats.duration = Some(self.start_time.elapsed());
        self.stats
    }
}

impl Default for PassStatsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
