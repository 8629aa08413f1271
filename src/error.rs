/*!
 * Error types for the limitgate binary
 */

use limitgate_engine::EngineError;
use limitgate_store::StoreError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LimitgateError>;

/// Exit code constants for structured process exit
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

#[derive(Error, Debug)]
pub enum LimitgateError {
    /// Configuration file missing or malformed
    #[error("configuration error: {0}")]
    Config(String),

    /// Cluster-state file missing or malformed
    #[error("cluster state file {path}: {reason}")]
    State { path: PathBuf, reason: String },

    /// A pass completed but left namespaces unconverged
    #[error("{0}")]
    PassIncomplete(String),

    /// A reconciliation pass failed at the pass level
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Store failure outside a pass
    #[error(transparent)]
    Store(#[from] StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl LimitgateError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        EXIT_FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_passes_through() {
        let err: LimitgateError =
            EngineError::InvalidSettings("max_parallel must be at least 1".to_string()).into();
        assert!(err.to_string().contains("max_parallel"));
        assert_eq!(err.exit_code(), EXIT_FAILURE);
    }
}
