//! Error types for the engine crate

use crate::projector::ProjectionError;
use limitgate_store::StoreError;
use std::time::Duration;
use thiserror::Error;

/// Pass-level failures
///
/// Per-namespace failures never surface here; they are recorded in
/// [`PassStats`](crate::PassStats) and the pass continues. An
/// `EngineError` means the pass as a whole could not produce a result and
/// the next trigger must retry.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("limit projection failed: {0}")]
    Projection(#[from] ProjectionError),

    #[error("store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("pass timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid controller settings: {0}")]
    InvalidSettings(String),
}
