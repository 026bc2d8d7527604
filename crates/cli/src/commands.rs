use std::fmt;
use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};

use crate::cli::{AddArgs, CliCommand, DeleteArgs, SearchArgs, SuggestArgs, TaskArgs};
use crate::core::model::{SearchHit, Task, TaskId};
use crate::core::{AddSource, Orchestrator, SyncError, ToggleOutcome};

pub async fn execute<R: BufRead, W: Write>(
    orchestrator: &Orchestrator,
    command: CliCommand,
    mut input: R,
    mut writer: W,
) -> Result<()> {
    match command {
        CliCommand::List => handle_list(orchestrator, &mut writer).await,
        CliCommand::Add(args) => handle_add(orchestrator, &args, &mut writer).await,
        CliCommand::Toggle(args) => handle_toggle(orchestrator, &args, &mut writer).await,
        CliCommand::Delete(args) => {
            handle_delete(orchestrator, &args, &mut input, &mut writer).await
        }
        CliCommand::Search(args) => handle_search(orchestrator, &args, &mut writer).await,
        CliCommand::Suggest(args) => handle_suggest(orchestrator, &args, &mut writer).await,
        CliCommand::Status => handle_status(orchestrator, &mut writer).await,
    }
}

async fn handle_list<W: Write>(orchestrator: &Orchestrator, mut writer: W) -> Result<()> {
    orchestrator.load_tasks().await.or_notice(orchestrator)?;
    let tasks = orchestrator.tasks();
    if tasks.is_empty() {
        writeln!(writer, "No tasks yet.")?;
    }
    for task in &tasks {
        writeln!(writer, "{}", TaskLine(task))?;
    }
    Ok(())
}

async fn handle_add<W: Write>(
    orchestrator: &Orchestrator,
    args: &AddArgs,
    mut writer: W,
) -> Result<()> {
    orchestrator.set_compose_text(args.joined());
    let task = orchestrator
        .add_task(AddSource::Compose)
        .await
        .or_notice(orchestrator)?;
    writeln!(writer, "{}", TaskLine(&task))?;
    Ok(())
}

async fn handle_toggle<W: Write>(
    orchestrator: &Orchestrator,
    args: &TaskArgs,
    mut writer: W,
) -> Result<()> {
    let id = TaskId::new(args.id.trim());
    orchestrator.load_tasks().await.or_notice(orchestrator)?;
    match orchestrator
        .toggle_task(&id)
        .await
        .or_notice(orchestrator)?
    {
        ToggleOutcome::Updated { completed } => {
            let task = orchestrator
                .tasks()
                .into_iter()
                .find(|task| task.id == id)
                .unwrap_or_else(|| Task::new(id.clone(), String::new(), completed));
            writeln!(writer, "{}", TaskLine(&task))?;
            Ok(())
        }
        ToggleOutcome::NotFound => bail!("Task {id} not found"),
    }
}

async fn handle_delete<R: BufRead, W: Write>(
    orchestrator: &Orchestrator,
    args: &DeleteArgs,
    input: &mut R,
    mut writer: W,
) -> Result<()> {
    let id = TaskId::new(args.id.trim());
    orchestrator.load_tasks().await.or_notice(orchestrator)?;
    let Some(pending) = orchestrator.request_delete(&id) else {
        bail!("Task {id} not found");
    };

    if !args.yes && !confirm(input, &mut writer, pending.text())? {
        writeln!(writer, "Cancelled.")?;
        return Ok(());
    }

    orchestrator
        .delete_task(pending)
        .await
        .or_notice(orchestrator)?;
    if let Some(notice) = orchestrator.take_notice() {
        writeln!(writer, "{}", notice.message)?;
    }
    Ok(())
}

async fn handle_search<W: Write>(
    orchestrator: &Orchestrator,
    args: &SearchArgs,
    mut writer: W,
) -> Result<()> {
    orchestrator
        .search(&args.joined())
        .await
        .or_notice(orchestrator)?;
    let results = orchestrator.search_results();
    if results.hits.is_empty() {
        writeln!(writer, "No relevant tasks found.")?;
    }
    for hit in &results.hits {
        writeln!(writer, "{}", HitLine(hit))?;
    }
    Ok(())
}

async fn handle_suggest<W: Write>(
    orchestrator: &Orchestrator,
    args: &SuggestArgs,
    mut writer: W,
) -> Result<()> {
    orchestrator.load_tasks().await.or_notice(orchestrator)?;
    let suggestions = orchestrator.suggest().await.or_notice(orchestrator)?;
    if suggestions.is_empty() {
        writeln!(writer, "No suggestions right now.")?;
    }
    for (index, suggestion) in suggestions.iter().enumerate() {
        writeln!(writer, "{}. {}", index + 1, suggestion)?;
    }

    let Some(number) = args.accept else {
        return Ok(());
    };
    let chosen = usize::try_from(number - 1)
        .ok()
        .and_then(|index| suggestions.get(index));
    let Some(text) = chosen else {
        bail!(
            "No suggestion number {number}; {} available",
            suggestions.len()
        );
    };
    let task = orchestrator
        .add_task(AddSource::Suggestion(text.clone()))
        .await
        .or_notice(orchestrator)?;
    writeln!(writer, "Added {}", TaskLine(&task))?;
    Ok(())
}

async fn handle_status<W: Write>(orchestrator: &Orchestrator, mut writer: W) -> Result<()> {
    orchestrator
        .check_health()
        .await
        .or_notice(orchestrator)?;
    writeln!(writer, "Task service is reachable.")?;
    Ok(())
}

fn confirm<R: BufRead, W: Write>(input: &mut R, mut writer: W, text: &str) -> Result<bool> {
    write!(writer, "Delete task '{text}'? [y/N] ")?;
    writer.flush()?;
    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// Attaches the orchestrator's error notice to a failed operation.
trait NoticeExt<T> {
    fn or_notice(self, orchestrator: &Orchestrator) -> Result<T>;
}

impl<T> NoticeExt<T> for Result<T, SyncError> {
    fn or_notice(self, orchestrator: &Orchestrator) -> Result<T> {
        self.map_err(|err| {
            let notice = orchestrator.take_notice().filter(|notice| notice.is_error());
            match notice {
                Some(notice) if !err.is_validation() => {
                    anyhow::Error::new(err).context(notice.message)
                }
                _ => anyhow::Error::new(err),
            }
        })
    }
}

struct TaskLine<'a>(&'a Task);

impl fmt::Display for TaskLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.0.completed { 'x' } else { ' ' };
        write!(f, "[{}] {} {}", mark, self.0.id, self.0.text)
    }
}

struct HitLine<'a>(&'a SearchHit);

impl fmt::Display for HitLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}  {} {}", self.0.score, self.0.id, self.0.text)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::core::api::{Endpoint, InMemoryTodoApi};

    fn setup<const N: usize>(texts: [&str; N]) -> (Orchestrator, Arc<InMemoryTodoApi>) {
        let api = Arc::new(InMemoryTodoApi::new().with_tasks(texts));
        (Orchestrator::new(api.clone()), api)
    }

    async fn run(orchestrator: &Orchestrator, command: CliCommand, input: &str) -> Result<String> {
        let mut output = Vec::new();
        execute(orchestrator, command, Cursor::new(input), &mut output).await?;
        Ok(String::from_utf8(output).expect("utf8"))
    }

    #[tokio::test]
    async fn list_prints_one_line_per_task() {
        let (orchestrator, api) = setup(["buy milk", "call mom"]);
        let output = run(&orchestrator, CliCommand::List, "").await.unwrap();

        assert_eq!(output, "[ ] 1 buy milk\n[ ] 2 call mom\n");
        assert_eq!(api.call_count(Endpoint::List), 1);
    }

    #[tokio::test]
    async fn list_of_nothing_says_so() {
        let (orchestrator, _api) = setup([]);
        let output = run(&orchestrator, CliCommand::List, "").await.unwrap();
        assert_eq!(output, "No tasks yet.\n");
    }

    #[tokio::test]
    async fn add_joins_words() {
        let (orchestrator, api) = setup(["buy milk"]);
        let command = CliCommand::Add(AddArgs {
            text: vec!["write".into(), "tests".into()],
        });

        let output = run(&orchestrator, command, "").await.unwrap();

        assert_eq!(output, "[ ] 2 write tests\n");
        assert_eq!(api.tasks().len(), 2);
    }

    #[tokio::test]
    async fn blank_add_reports_validation_message() {
        let (orchestrator, api) = setup([]);
        let command = CliCommand::Add(AddArgs {
            text: vec!["  ".into()],
        });

        let err = run(&orchestrator, command, "").await.unwrap_err();

        assert_eq!(err.to_string(), "Please enter a task to add.");
        assert_eq!(api.call_count(Endpoint::Create), 0);
    }

    #[tokio::test]
    async fn toggle_marks_task_done() {
        let (orchestrator, _api) = setup(["a", "b", "ship release"]);
        let command = CliCommand::Toggle(TaskArgs { id: "3".into() });

        let output = run(&orchestrator, command, "").await.unwrap();
        assert_eq!(output, "[x] 3 ship release\n");
    }

    #[tokio::test]
    async fn toggle_unknown_task_fails() {
        let (orchestrator, api) = setup(["a"]);
        let command = CliCommand::Toggle(TaskArgs { id: "9".into() });

        let err = run(&orchestrator, command, "").await.unwrap_err();

        assert_eq!(err.to_string(), "Task 9 not found");
        assert_eq!(api.call_count(Endpoint::Update), 0);
    }

    #[rstest]
    #[case("y\n", true)]
    #[case("YES\n", true)]
    #[case("n\n", false)]
    #[case("\n", false)]
    #[tokio::test]
    async fn delete_honours_confirmation(#[case] answer: &str, #[case] deleted: bool) {
        let (orchestrator, api) = setup(["a", "b", "c"]);
        let command = CliCommand::Delete(DeleteArgs {
            id: "3".into(),
            yes: false,
        });

        let output = run(&orchestrator, command, answer).await.unwrap();

        assert!(output.starts_with("Delete task 'c'? [y/N] "));
        assert_eq!(api.call_count(Endpoint::Delete), usize::from(deleted));
        assert_eq!(api.tasks().len(), if deleted { 2 } else { 3 });
        if deleted {
            assert!(output.ends_with("Deleted task 'c'.\n"));
        } else {
            assert!(output.ends_with("Cancelled.\n"));
        }
    }

    #[tokio::test]
    async fn delete_with_yes_skips_prompt() {
        let (orchestrator, api) = setup(["a"]);
        let command = CliCommand::Delete(DeleteArgs {
            id: "1".into(),
            yes: true,
        });

        let output = run(&orchestrator, command, "").await.unwrap();

        assert_eq!(output, "Deleted task 'a'.\n");
        assert!(api.tasks().is_empty());
    }

    #[tokio::test]
    async fn search_prints_scored_hits() {
        let (orchestrator, _api) = setup(["buy milk", "call mom"]);
        let command = CliCommand::Search(SearchArgs {
            query: vec!["milk".into()],
        });

        let output = run(&orchestrator, command, "").await.unwrap();
        assert_eq!(output, "1.00  1 buy milk\n");
    }

    #[tokio::test]
    async fn search_without_hits_says_so() {
        let (orchestrator, _api) = setup(["buy milk"]);
        let command = CliCommand::Search(SearchArgs {
            query: vec!["quantum".into()],
        });

        let output = run(&orchestrator, command, "").await.unwrap();
        assert_eq!(output, "No relevant tasks found.\n");
    }

    #[tokio::test]
    async fn suggest_lists_and_accepts() {
        let api = Arc::new(
            InMemoryTodoApi::new()
                .with_tasks(["buy milk", "call mom"])
                .with_suggestions(["water plants", "book dentist"]),
        );
        let orchestrator = Orchestrator::new(api.clone());
        let command = CliCommand::Suggest(SuggestArgs { accept: Some(2) });

        let output = run(&orchestrator, command, "").await.unwrap();

        assert_eq!(
            output,
            "1. water plants\n2. book dentist\nAdded [ ] 3 book dentist\n"
        );
        assert_eq!(api.tasks().len(), 3);
    }

    #[tokio::test]
    async fn suggest_rejects_out_of_range_choice() {
        let (orchestrator, api) = setup(["buy milk", "call mom"]);
        let command = CliCommand::Suggest(SuggestArgs { accept: Some(9) });

        assert!(run(&orchestrator, command, "").await.is_err());
        assert_eq!(api.call_count(Endpoint::Create), 0);
    }

    #[tokio::test]
    async fn server_failure_surfaces_notice() {
        let (orchestrator, api) = setup(["buy milk"]);
        api.fail(Endpoint::List);

        let err = run(&orchestrator, CliCommand::List, "").await.unwrap_err();

        assert_eq!(err.to_string(), "Could not fetch tasks from the server.");
        assert!(format!("{err:#}").contains("503"));
    }

    #[tokio::test]
    async fn status_reports_reachability() {
        let (orchestrator, api) = setup([]);
        let output = run(&orchestrator, CliCommand::Status, "").await.unwrap();
        assert_eq!(output, "Task service is reachable.\n");

        api.fail(Endpoint::Health);
        assert!(run(&orchestrator, CliCommand::Status, "").await.is_err());
    }
}
