//! Limitgate Engine: the convergence core
//!
//! Given one declarative [`Policy`](limitgate_model::Policy) and the live
//! namespace set, the engine makes reality match the policy and keeps it
//! that way:
//!
//! ```text
//! ┌─────────────┐
//! │  Scan       │──> List namespaces, filter through include/exclude
//! └──────┬──────┘
//!        │
//!        v
//! ┌─────────────┐
//! │  Project    │──> Parse every limit rule into exact quantities
//! └──────┬──────┘
//!        │
//!        v
//! ┌─────────────┐
//! │  Converge   │──> Per namespace: create / update / leave alone
//! └──────┬──────┘
//!        │
//!        v
//! ┌─────────────┐
//! │  Prune      │──> Delete owned objects that fell out of scope
//! └──────┬──────┘
//!        │
//!        └────> Periodic resync repeats the pass to heal drift
//! ```
//!
//! Per-namespace work fans out as independent tokio tasks behind a
//! semaphore; one namespace failing never aborts its siblings, and the
//! whole pass is idempotent: rerunning it against unchanged state
//! performs zero writes.
//!
//! # Example
//!
//! ```no_run
//! use limitgate_engine::{Controller, ControllerSettings};
//! use limitgate_store::MemoryStore;
//! use std::sync::Arc;
//! use tokio::sync::watch;
//!
//! # async fn example() -> Result<(), limitgate_engine::EngineError> {
//! let store = Arc::new(MemoryStore::new());
//! let controller = Controller::new(store, ControllerSettings::default())?;
//!
//! let (_shutdown_tx, shutdown_rx) = watch::channel(false);
//! controller.run(shutdown_rx).await;
//! # Ok(())
//! # }
//! ```

pub mod cleanup;
pub mod controller;
pub mod converge;
pub mod error;
pub mod metrics;
pub mod projector;
pub mod scanner;
pub mod scope;
pub mod writer;

pub use cleanup::CleanupEngine;
pub use controller::{Controller, ControllerSettings, ReconcileOutcome};
pub use converge::ConvergenceEngine;
pub use error::EngineError;
pub use metrics::{NamespaceFailure, PassStats};
pub use projector::{project, ProjectionError};
pub use writer::{ObjectWriter, WriteOutcome};
