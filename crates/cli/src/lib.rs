pub mod cli;
pub mod commands;
pub mod config;

use anyhow::{Context, Result};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

pub use tasksync_core as core;

use crate::cli::{Cli, CliCommand};
use crate::core::Orchestrator;

/// Execute one CLI invocation against the configured task service.
pub async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.log_filter.clone())?;

    let config = config::from_cli(&cli)?;
    let orchestrator =
        Orchestrator::connect(&config).context("failed to build task service client")?;
    tracing::debug!(api_url = %config.api_url(), "client configured");

    let command = cli.command.unwrap_or(CliCommand::List);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    commands::execute(&orchestrator, command, stdin.lock(), stdout.lock()).await
}

/// Run the CLI by creating an internal Tokio runtime.
pub fn run_blocking(cli: Cli) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    runtime.block_on(run(cli))
}

fn init_tracing(filter: Option<String>) -> Result<()> {
    let filter = filter.unwrap_or_else(|| "warn".to_string());
    let directive: Directive = filter
        .parse()
        .with_context(|| format!("invalid log directive '{filter}'"))?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
    Ok(())
}
