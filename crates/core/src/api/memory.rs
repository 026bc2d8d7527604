use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{ApiError, TodoApi};
use crate::model::{SearchHit, Task, TaskId};

/// Matches scoring below this are dropped, like the backend's search endpoint.
const MIN_SCORE_THRESHOLD: f64 = 0.30;
const DERIVED_SUGGESTION_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    List,
    Create,
    Update,
    Delete,
    Search,
    Suggest,
    Health,
}

/// A request observed by [`InMemoryTodoApi`], in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    List,
    Create(String),
    Update { id: TaskId, completed: bool },
    Delete(TaskId),
    Search(String),
    Suggest(Vec<String>),
    Health,
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: u64,
    tasks: Vec<Task>,
    suggestions: Option<Vec<String>>,
    failing: HashSet<Endpoint>,
    echo_updates: bool,
    calls: Vec<ApiCall>,
}

/// In-process stand-in for the task service.
///
/// Ids are sequential integers rendered as strings. Endpoints can be switched
/// into a failing mode to exercise error paths.
#[derive(Debug)]
pub struct InMemoryTodoApi {
    state: Mutex<MemoryState>,
}

impl Default for InMemoryTodoApi {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTodoApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                next_id: 1,
                echo_updates: true,
                ..MemoryState::default()
            }),
        }
    }

    /// Seed the backend with tasks, assigning ids in order.
    pub fn with_tasks<I, S>(self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        {
            let mut state = self.state.lock();
            for text in texts {
                let id = state.next_id;
                state.next_id += 1;
                state.tasks.push(Task::new(id, text, false));
            }
        }
        self
    }

    /// Fix the suggestions returned by `suggest`, instead of deriving them.
    pub fn with_suggestions<I, S>(self, suggestions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.lock().suggestions = Some(suggestions.into_iter().map(Into::into).collect());
        self
    }

    /// Whether update acknowledgements carry the stored `completed` value.
    pub fn echo_updates(&self, echo: bool) {
        self.state.lock().echo_updates = echo;
    }

    pub fn fail(&self, endpoint: Endpoint) {
        self.state.lock().failing.insert(endpoint);
    }

    pub fn recover(&self, endpoint: Endpoint) {
        self.state.lock().failing.remove(&endpoint);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().calls.clone()
    }

    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| call.endpoint() == endpoint)
            .count()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().tasks.clone()
    }

    fn begin(&self, call: ApiCall) -> Result<parking_lot::MutexGuard<'_, MemoryState>, ApiError> {
        let mut state = self.state.lock();
        let endpoint = call.endpoint();
        state.calls.push(call);
        if state.failing.contains(&endpoint) {
            return Err(ApiError::status(503, "service unavailable"));
        }
        Ok(state)
    }
}

impl ApiCall {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            ApiCall::List => Endpoint::List,
            ApiCall::Create(_) => Endpoint::Create,
            ApiCall::Update { .. } => Endpoint::Update,
            ApiCall::Delete(_) => Endpoint::Delete,
            ApiCall::Search(_) => Endpoint::Search,
            ApiCall::Suggest(_) => Endpoint::Suggest,
            ApiCall::Health => Endpoint::Health,
        }
    }
}

#[async_trait]
impl TodoApi for InMemoryTodoApi {
    async fn list(&self) -> Result<Vec<Task>, ApiError> {
        let state = self.begin(ApiCall::List)?;
        Ok(state.tasks.clone())
    }

    async fn create(&self, text: &str) -> Result<Task, ApiError> {
        let mut state = self.begin(ApiCall::Create(text.to_string()))?;
        let id = state.next_id;
        state.next_id += 1;
        let task = Task::new(id, text, false);
        state.tasks.push(task.clone());
        Ok(task)
    }

    async fn update_completed(
        &self,
        id: &TaskId,
        completed: bool,
    ) -> Result<Option<bool>, ApiError> {
        let mut state = self.begin(ApiCall::Update {
            id: id.clone(),
            completed,
        })?;
        let echo = state.echo_updates;
        let Some(task) = state.tasks.iter_mut().find(|task| &task.id == id) else {
            return Err(ApiError::status(404, "Todo not found"));
        };
        task.completed = completed;
        Ok(echo.then_some(task.completed))
    }

    async fn delete(&self, id: &TaskId) -> Result<(), ApiError> {
        let mut state = self.begin(ApiCall::Delete(id.clone()))?;
        let before = state.tasks.len();
        state.tasks.retain(|task| &task.id != id);
        if state.tasks.len() == before {
            return Err(ApiError::status(404, "Todo not found"));
        }
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ApiError> {
        let state = self.begin(ApiCall::Search(query.to_string()))?;
        let mut hits: Vec<SearchHit> = state
            .tasks
            .iter()
            .map(|task| SearchHit {
                id: task.id.clone(),
                text: task.text.clone(),
                score: relevance(&task.text, query),
            })
            .filter(|hit| hit.score >= MIN_SCORE_THRESHOLD)
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(hits)
    }

    async fn suggest(&self, tasks: &[String]) -> Result<Vec<String>, ApiError> {
        let state = self.begin(ApiCall::Suggest(tasks.to_vec()))?;
        if let Some(fixed) = &state.suggestions {
            return Ok(fixed.clone());
        }
        Ok(tasks
            .iter()
            .take(DERIVED_SUGGESTION_LIMIT)
            .map(|text| format!("Follow up on {}", text.trim()))
            .collect())
    }

    async fn health(&self) -> Result<(), ApiError> {
        drop(self.begin(ApiCall::Health)?);
        Ok(())
    }
}

/// Share of query words found in the text, case-insensitively.
fn relevance(text: &str, query: &str) -> f64 {
    let haystack = text.to_lowercase();
    let words: Vec<String> = query
        .split_whitespace()
        .map(|word| word.to_lowercase())
        .collect();
    if words.is_empty() {
        return 0.0;
    }
    let matched = words
        .iter()
        .filter(|word| haystack.contains(word.as_str()))
        .count();
    matched as f64 / words.len() as f64
}
