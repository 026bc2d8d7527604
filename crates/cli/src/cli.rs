use std::path::PathBuf;

use clap::{value_parser, Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tasksync",
    version,
    about = "Command-line client for a remote to-do service with semantic search and suggestions.",
    after_help = "Examples:\n  tasksync                      List tasks (same as `tasksync list`)\n  tasksync add buy milk\n  tasksync search groceries\n  tasksync suggest --accept 1\n  tasksync delete 3 --yes"
)]
pub struct Cli {
    /// Base URL of the task service (defaults to http://127.0.0.1:8000)
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds (no timeout unless configured)
    #[arg(long = "timeout", value_name = "SECS", global = true, value_parser = value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Directory holding config.json (defaults to the platform config dir)
    #[arg(long = "config-dir", value_name = "PATH", global = true)]
    pub config_dir: Option<PathBuf>,

    /// Override the tracing filter (e.g. "info", "debug", or full directives)
    #[arg(long = "log", value_name = "DIRECTIVE", global = true)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Load and print every task (default command)
    List,
    /// Add a task
    Add(AddArgs),
    /// Flip the completion state of a task
    Toggle(TaskArgs),
    /// Delete a task after confirmation
    Delete(DeleteArgs),
    /// Rank tasks by meaning rather than exact words
    Search(SearchArgs),
    /// Ask the service for follow-up tasks
    Suggest(SuggestArgs),
    /// Check that the task service is reachable
    Status,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct AddArgs {
    /// Task text; multiple words are joined with spaces
    #[arg(value_name = "TEXT", required = true)]
    pub text: Vec<String>,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct TaskArgs {
    #[arg(value_name = "ID")]
    pub id: String,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct DeleteArgs {
    #[arg(value_name = "ID")]
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct SearchArgs {
    #[arg(value_name = "QUERY", required = true)]
    pub query: Vec<String>,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct SuggestArgs {
    /// Add the N-th suggestion (1-based) as a new task
    #[arg(long, value_name = "N", value_parser = value_parser!(u64).range(1..))]
    pub accept: Option<u64>,
}

impl AddArgs {
    pub fn joined(&self) -> String {
        self.text.join(" ")
    }
}

impl SearchArgs {
    pub fn joined(&self) -> String {
        self.query.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_subcommand_means_list() {
        let cli = Cli::try_parse_from(["tasksync"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "tasksync",
            "add",
            "buy",
            "milk",
            "--api-url",
            "http://todo.local:9000",
            "--timeout",
            "5",
        ])
        .unwrap();

        assert_eq!(cli.api_url.as_deref(), Some("http://todo.local:9000"));
        assert_eq!(cli.timeout, Some(5));
        match cli.command {
            Some(CliCommand::Add(args)) => assert_eq!(args.joined(), "buy milk"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn zero_timeout_and_accept_are_rejected() {
        assert!(Cli::try_parse_from(["tasksync", "--timeout", "0", "list"]).is_err());
        assert!(Cli::try_parse_from(["tasksync", "suggest", "--accept", "0"]).is_err());
    }

    #[test]
    fn add_requires_text() {
        assert!(Cli::try_parse_from(["tasksync", "add"]).is_err());
    }
}
