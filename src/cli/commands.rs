use crate::config::ServerConfig;
use crate::router::PathPattern;
use crate::server::HttpServer;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use super::demo::demo_router;

/// Command-line interface for segrouter
#[derive(Parser)]
#[command(name = "segrouter", version)]
#[command(about = "First-match HTTP router with typed path segments", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Serve the demo route table over HTTP
    Serve {
        /// YAML server configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Address and port to bind (overrides config and SEGR_BIND)
        #[arg(long)]
        bind: Option<String>,

        /// Worker thread count (overrides config and SEGR_WORKERS)
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Test paths against a pattern template such as `/users/{int}`
    Check {
        /// Pattern template; `{string}`/`{*}` match any segment, `{int}` an integer
        #[arg(short, long)]
        pattern: String,

        /// Paths to test
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

/// Outcome of testing one path in `check`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub path: String,
    /// Result of the router's (prefix) match
    pub matches: bool,
    /// Result when segment counts must also agree
    pub exact: bool,
}

/// Test every path against `template`.
///
/// # Errors
///
/// Fails if the template uses an unknown placeholder.
pub fn check_paths(template: &str, paths: &[String]) -> Result<Vec<CheckResult>> {
    let pattern = PathPattern::from_template(template)
        .with_context(|| format!("invalid pattern {template:?}"))?;
    Ok(paths
        .iter()
        .map(|path| CheckResult {
            path: path.clone(),
            matches: pattern.matches(path),
            exact: pattern.matches_exact(path),
        })
        .collect())
}

/// Execute the parsed command.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the pattern cannot be
/// parsed, or the server cannot bind its address.
pub fn run_cli(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve {
            config,
            bind,
            workers,
        } => serve(config, bind, workers),
        Commands::Check { pattern, paths } => {
            for result in check_paths(&pattern, &paths)? {
                println!(
                    "{}\tmatch={}\texact={}",
                    result.path, result.matches, result.exact
                );
            }
            Ok(())
        }
    }
}

fn serve(config: Option<PathBuf>, bind: Option<String>, workers: Option<usize>) -> Result<()> {
    let mut cfg = match config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    }
    .apply_env()?;
    if let Some(bind) = bind {
        cfg.bind = bind;
    }
    if let Some(workers) = workers {
        cfg.workers = workers;
    }
    cfg.validate()?;

    let router = demo_router();
    router.dump_routes();

    let handle = HttpServer::new(Arc::new(router))
        .workers(cfg.workers)
        .fallback_status(cfg.fallback()?)
        .start(cfg.bind.as_str())
        .with_context(|| format!("failed to start server on {}", cfg.bind))?;
    info!(addr = %handle.addr(), "Listening");

    wait_for_shutdown(handle)
}

#[cfg(unix)]
fn wait_for_shutdown(handle: crate::server::ServerHandle) -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals =
        Signals::new([SIGINT, SIGTERM]).context("failed to install signal handlers")?;
    if let Some(signal) = signals.forever().next() {
        info!(signal, "Shutdown signal received");
    }
    handle.stop();
    Ok(())
}

#[cfg(not(unix))]
fn wait_for_shutdown(handle: crate::server::ServerHandle) -> Result<()> {
    handle.join();
    Ok(())
}
