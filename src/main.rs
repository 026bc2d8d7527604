use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = tasksync::cli::Cli::parse();
    tasksync::run_blocking(cli)
}
