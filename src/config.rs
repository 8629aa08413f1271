/*!
 * Configuration types for limitgate
 */

use crate::error::{LimitgateError, Result};
use limitgate_engine::ControllerSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Main configuration for the limitgate process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitgateConfig {
    /// Name of the singleton policy to enforce
    #[serde(default = "default_policy_name")]
    pub policy_name: String,

    /// Periodic resync interval in seconds
    #[serde(default = "default_resync_interval_secs")]
    pub resync_interval_secs: u64,

    /// Maximum concurrent per-namespace operations within a pass
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,

    /// Upper bound on a single pass, in seconds
    #[serde(default = "default_pass_timeout_secs")]
    pub pass_timeout_secs: u64,

    /// Log level for diagnostic output
    #[serde(default)]
    pub log_level: LogLevel,

    /// Log file path (None = stdout)
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging (shorthand for log_level = debug)
    #[serde(default)]
    pub verbose: bool,

    /// Cluster-state seed file for one-shot runs
    #[serde(default)]
    pub state_file: Option<PathBuf>,
}

fn default_policy_name() -> String {
    "global-limits".to_string()
}

fn default_resync_interval_secs() -> u64 {
    30 * 60
}

fn default_max_parallel() -> usize {
    16
}

fn default_pass_timeout_secs() -> u64 {
    60
}

impl Default for LimitgateConfig {
    fn default() -> Self {
        Self {
            policy_name: default_policy_name(),
            resync_interval_secs: default_resync_interval_secs(),
            max_parallel: default_max_parallel(),
            pass_timeout_secs: default_pass_timeout_secs(),
            log_level: LogLevel::default(),
            log_file: None,
            verbose: false,
            state_file: None,
        }
    }
}

impl LimitgateConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LimitgateError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        toml::from_str(&contents)
            .map_err(|e| LimitgateError::Config(format!("cannot parse {}: {}", path.display(), e)))
    }

    /// Controller settings derived from this configuration
    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            policy_name: self.policy_name.clone(),
            resync_interval: Duration::from_secs(self.resync_interval_secs),
            max_parallel: self.max_parallel,
            pass_timeout: Duration::from_secs(self.pass_timeout_secs),
        }
    }
}
