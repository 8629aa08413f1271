/*!
 * limitgate CLI
 *
 * Runs the convergence controller as a daemon (`run`), drives single
 * passes (`converge`, `cleanup`), and validates policy files (`check`).
 * One-shot subcommands operate on a declarative cluster-state file.
 */

use clap::{Parser, Subcommand};
use limitgate::{
    error::{LimitgateError, Result, EXIT_SUCCESS},
    logging, ClusterState, LimitgateConfig, LogLevel,
};
use limitgate_engine::{CleanupEngine, Controller, PassStats, ReconcileOutcome};
use limitgate_model::Policy;
use limitgate_store::ObjectStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "limitgate")]
#[command(version, about = "Cluster-wide limit policy convergence engine", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Cluster-state file (overrides the config's state_file)
    #[arg(long, value_name = "FILE", global = true)]
    state: Option<PathBuf>,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log to a file (JSON lines) instead of stdout
    #[arg(long, value_name = "FILE", global = true)]
    log: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the controller loop until interrupted
    Run,

    /// Run a single reconciliation pass and print its statistics
    Converge {
        /// Emit statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a single cleanup sweep and print its statistics
    Cleanup {
        /// Emit statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a policy file without touching any store
    Check {
        /// Policy file (TOML)
        file: PathBuf,
    },
}

fn main() {
    let code = match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => LimitgateConfig::from_toml_file(path)?,
        None => LimitgateConfig::default(),
    };
    if cli.verbose {
        config.verbose = true;
        config.log_level = LogLevel::Debug;
    }
    if cli.log.is_some() {
        config.log_file = cli.log.clone();
    }
    if cli.state.is_some() {
        config.state_file = cli.state.clone();
    }

    logging::init_logging(&config)?;

    let runtime = tokio::runtime::Runtime::new().map_err(LimitgateError::Io)?;
    runtime.block_on(handle_subcommand(cli.command, config))
}

async fn handle_subcommand(command: Commands, config: LimitgateConfig) -> Result<()> {
    match command {
        Commands::Run => run_controller(&config).await,
        Commands::Converge { json } => {
            let controller = build_controller(&config).await?;
            let outcome = controller.reconcile().await.map_err(LimitgateError::from)?;
            let pass = match outcome {
                ReconcileOutcome::Converged(_) => "converge",
                ReconcileOutcome::CleanedUp(_) => "cleanup (no policy)",
            };
            report_pass(pass, outcome.stats(), json)
        }
        Commands::Cleanup { json } => {
            let store = load_store(&config).await?;
            let cleanup = CleanupEngine::new(store, config.max_parallel);
            let stats = cleanup.cleanup().await.map_err(LimitgateError::from)?;
            report_pass("cleanup", &stats, json)
        }
        Commands::Check { file } => check_policy(&file),
    }
}

async fn run_controller(config: &LimitgateConfig) -> Result<()> {
    let controller = build_controller(config).await?;
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received; stopping controller");
            let _ = shutdown_tx.send(true);
        }
    });

    controller.run(shutdown_rx).await;
    Ok(())
}

async fn build_controller(config: &LimitgateConfig) -> Result<Controller> {
    let store = load_store(config).await?;
    Controller::new(store, config.controller_settings()).map_err(LimitgateError::from)
}

/// Seed an in-memory store from the configured cluster-state file, or
/// start empty when none is given
async fn load_store(config: &LimitgateConfig) -> Result<Arc<dyn ObjectStore>> {
    let state = match config.state_file {
        Some(ref path) => ClusterState::from_toml_file(path)?,
        None => ClusterState::default(),
    };
    Ok(Arc::new(state.into_store().await))
}

fn report_pass(pass: &str, stats: &PassStats, json: bool) -> Result<()> {
    if json {
        let rendered = serde_json::to_string_pretty(stats)
            .map_err(|e| LimitgateError::Config(format!("cannot serialize statistics: {}", e)))?;
        println!("{}", rendered);
    } else {
        println!("{} pass: {}", pass, stats.summary());
        for failure in &stats.failures {
            println!("  failed {}: {}", failure.namespace, failure.error);
        }
    }
    if stats.is_clean() {
        Ok(())
    } else {
        Err(LimitgateError::PassIncomplete(format!(
            "{} pass finished with {} failure(s) and {} conflict(s)",
            pass, stats.failed, stats.conflicts
        )))
    }
}

/// Parse a policy file and project its rules, reporting the first
/// malformed quantity with its rule index and field
fn check_policy(path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| LimitgateError::Config(format!("cannot read {}: {}", path.display(), e)))?;
    let policy: Policy = toml::from_str(&contents)
        .map_err(|e| LimitgateError::Config(format!("cannot parse {}: {}", path.display(), e)))?;

    let resolved = limitgate_engine::project(&policy.limits)
        .map_err(|e| LimitgateError::Config(format!("invalid policy {}: {}", policy.name, e)))?;

    println!(
        "policy {} ok: {} limit rule(s), include={:?}, exclude={:?}",
        policy.name,
        resolved.len(),
        policy.include_namespaces,
        policy.exclude_namespaces
    );
    Ok(())
}
