/*!
 * Limitgate - cluster limit-policy convergence
 *
 * Process bootstrap for the convergence engine:
 * - TOML configuration loading with sane defaults
 * - Structured logging (tracing) to stdout or a JSON file
 * - Declarative cluster-state files for one-shot and demo runs
 * - Top-level error type with process exit codes
 *
 * The actual convergence logic lives in the workspace crates:
 * `limitgate-model`, `limitgate-store`, `limitgate-engine`.
 */

pub mod config;
pub mod error;
pub mod logging;
pub mod state;

// Re-export commonly used types
pub use config::{LimitgateConfig, LogLevel};
pub use error::{LimitgateError, Result, EXIT_FAILURE, EXIT_SUCCESS};
pub use state::ClusterState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
