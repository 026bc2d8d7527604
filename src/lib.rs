pub use tasksync_cli::cli;
pub use tasksync_cli::commands;
pub use tasksync_cli::config;
pub use tasksync_cli::{run, run_blocking};

pub use tasksync_core as core;
pub use tasksync_core::api;
pub use tasksync_core::model;
pub use tasksync_core::sync;
pub use tasksync_core::{ClientConfig, Orchestrator};
