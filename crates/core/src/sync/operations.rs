//! The six user intents: validate locally, make one round-trip, then apply
//! the confirmed result.

use crate::api::ApiError;
use crate::capture::{require_query, require_text, AddSource, ValidationError};
use crate::error::SyncError;
use crate::gate::OperationGate;
use crate::model::{Task, TaskId};
use crate::telemetry::Event as TelemetryEvent;

use super::orchestrator::Orchestrator;
use super::state::{Notice, PendingDelete, ToggleOutcome};

/// Suggestions need enough existing tasks to say something useful.
pub const MIN_TASKS_FOR_SUGGESTIONS: usize = 2;

impl Orchestrator {
    /// Replace the collection with the server's list. Returns the task count.
    pub async fn load_tasks(&self) -> Result<usize, SyncError> {
        let Some(_guard) = self.load_gate.try_start() else {
            return Err(self.reject_busy(&self.load_gate));
        };
        self.telemetry.record(TelemetryEvent::LoadStarted);

        match self.api.list().await {
            Ok(records) => {
                let count = {
                    let mut state = self.state.lock();
                    state.tasks.load_all(records);
                    state.tasks.len()
                };
                self.telemetry
                    .record(TelemetryEvent::LoadCompleted { count });
                Ok(count)
            }
            Err(err) => Err(self.fail(
                "fetch tasks",
                "Could not fetch tasks from the server.",
                err,
            )),
        }
    }

    /// Create a task from the compose box or a suggestion chip.
    ///
    /// On success the compose text is cleared; suggestions are cleared only
    /// for a compose-box submission.
    pub async fn add_task(&self, source: AddSource) -> Result<Task, SyncError> {
        let text = match &source {
            AddSource::Compose => self.compose_text(),
            AddSource::Suggestion(text) => text.clone(),
        };
        if let Err(err) = require_text(&text) {
            return Err(self.reject_invalid("add task", err));
        }

        let _ticket = self.track_mutation();
        let created = match self.api.create(&text).await {
            Ok(task) => task,
            Err(err) => return Err(self.fail("add the task", "Could not add the task.", err)),
        };

        {
            let mut state = self.state.lock();
            state.tasks.insert(created.clone());
            state.compose.clear();
            if !source.is_suggestion() {
                state.results.clear_suggestions();
            }
            state.notice = Some(Notice::info(format!("Added task '{}'.", created.text)));
        }
        self.telemetry.record(TelemetryEvent::TaskAdded {
            id: created.id.to_string(),
            from_suggestion: source.is_suggestion(),
        });
        Ok(created)
    }

    /// Flip the completion flag of a task currently in the collection.
    ///
    /// The requested value is the inverse of the local flag before the call.
    /// When the server echoes the stored value, that value is applied instead.
    pub async fn toggle_task(&self, id: &TaskId) -> Result<ToggleOutcome, SyncError> {
        let current = self.state.lock().tasks.get(id);
        let Some(task) = current else {
            tracing::debug!(task_id = %id, "toggle ignored for unknown task");
            return Ok(ToggleOutcome::NotFound);
        };
        let requested = !task.completed;

        let _ticket = self.track_mutation();
        let echoed = match self.api.update_completed(id, requested).await {
            Ok(echoed) => echoed,
            Err(err) => {
                return Err(self.fail(
                    "update the task",
                    "Could not update the task status.",
                    err,
                ))
            }
        };

        let completed = echoed.unwrap_or(requested);
        if echoed.is_some_and(|value| value != requested) {
            tracing::warn!(task_id = %id, requested, completed, "server stored a different completion state");
        }
        // A delete may have landed while the update was in flight.
        if !self.state.lock().tasks.set_completed(id, completed) {
            return Ok(ToggleOutcome::NotFound);
        }
        self.telemetry.record(TelemetryEvent::TaskToggled {
            id: id.to_string(),
            completed,
        });
        Ok(ToggleOutcome::Updated { completed })
    }

    /// First half of a delete: look up the task to confirm.
    pub fn request_delete(&self, id: &TaskId) -> Option<PendingDelete> {
        let task = self.state.lock().tasks.get(id)?;
        Some(PendingDelete {
            id: task.id,
            text: task.text,
        })
    }

    /// Second half of a delete, issued once the user has confirmed.
    pub async fn delete_task(&self, pending: PendingDelete) -> Result<(), SyncError> {
        let _ticket = self.track_mutation();
        if let Err(err) = self.api.delete(&pending.id).await {
            return Err(self.fail("delete the task", "Could not delete the task.", err));
        }

        {
            let mut state = self.state.lock();
            state.tasks.remove(&pending.id);
            state.notice = Some(Notice::info(format!("Deleted task '{}'.", pending.text)));
        }
        self.telemetry
            .record(TelemetryEvent::TaskDeleted(pending.id.to_string()));
        Ok(())
    }

    /// Rank tasks by meaning. Returns the hit count; hits are read through
    /// [`Orchestrator::search_results`].
    pub async fn search(&self, query: &str) -> Result<usize, SyncError> {
        if let Err(err) = require_query(query) {
            return Err(self.reject_invalid("search", err));
        }
        let Some(_guard) = self.search_gate.try_start() else {
            return Err(self.reject_busy(&self.search_gate));
        };

        match self.api.search(query).await {
            Ok(hits) => {
                let count = hits.len();
                self.state.lock().results.replace_search(hits);
                self.telemetry
                    .record(TelemetryEvent::SearchCompleted { hits: count });
                Ok(count)
            }
            Err(err) => Err(self.fail("search tasks", "Could not perform search.", err)),
        }
    }

    /// Ask for follow-up tasks based on every task text in the collection.
    pub async fn suggest(&self) -> Result<Vec<String>, SyncError> {
        let texts = self.state.lock().tasks.texts();
        if texts.len() < MIN_TASKS_FOR_SUGGESTIONS {
            return Err(self.reject_invalid(
                "suggest",
                ValidationError::NotEnoughTasks {
                    required: MIN_TASKS_FOR_SUGGESTIONS,
                    available: texts.len(),
                },
            ));
        }
        let Some(_guard) = self.suggest_gate.try_start() else {
            return Err(self.reject_busy(&self.suggest_gate));
        };

        match self.api.suggest(&texts).await {
            Ok(suggestions) => {
                self.state
                    .lock()
                    .results
                    .replace_suggestions(suggestions.clone());
                self.telemetry.record(TelemetryEvent::SuggestionsReceived {
                    count: suggestions.len(),
                });
                Ok(suggestions)
            }
            Err(err) => {
                // Stale suggestions must not outlive a failed refresh.
                self.state.lock().results.clear_suggestions();
                Err(self.fail("get suggestions", "Could not get suggestions.", err))
            }
        }
    }

    /// Probe the service root.
    pub async fn check_health(&self) -> Result<(), SyncError> {
        if let Err(err) = self.api.health().await {
            return Err(self.fail(
                "reach the server",
                "Could not reach the task service.",
                err,
            ));
        }
        tracing::debug!("task service reachable");
        Ok(())
    }

    fn reject_invalid(&self, operation: &str, err: ValidationError) -> SyncError {
        tracing::debug!(operation, reason = %err, "rejected before sending");
        self.set_notice(Notice::error(err.title(), err.to_string()));
        self.telemetry.record(TelemetryEvent::Rejected {
            operation: operation.to_string(),
            reason: err.to_string(),
        });
        SyncError::Validation(err)
    }

    fn reject_busy(&self, gate: &OperationGate) -> SyncError {
        let class = gate.class();
        tracing::debug!(class = class.as_str(), "operation already in flight");
        self.telemetry.record(TelemetryEvent::Rejected {
            operation: class.to_string(),
            reason: "busy".into(),
        });
        SyncError::Busy(class)
    }

    fn fail(&self, operation: &'static str, message: &str, err: ApiError) -> SyncError {
        tracing::warn!(operation, error = %err, "task service call failed");
        self.set_notice(Notice::error("Error", message));
        self.telemetry.record(TelemetryEvent::Failed {
            operation: operation.to_string(),
            error: err.to_string(),
        });
        SyncError::transport(operation, err)
    }
}
