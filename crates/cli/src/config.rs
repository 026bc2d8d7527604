use std::time::Duration;

use anyhow::Context;
pub use tasksync_core::config::*;

use crate::cli::Cli;

pub fn from_cli(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let overrides = ConfigOverrides {
        api_url: cli.api_url.clone(),
        request_timeout: cli.timeout.map(Duration::from_secs),
        config_dir: cli.config_dir.clone(),
    };
    ClientConfig::discover(overrides).context("failed to resolve client configuration")
}
