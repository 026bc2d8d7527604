//! State shapes shared between the orchestrator and its readers.

use crate::model::TaskId;
use crate::results::ResultHolder;
use crate::store::TaskCollection;

/// Everything the orchestrator mutates, guarded by a single lock.
#[derive(Debug, Default)]
pub(crate) struct SyncState {
    pub(crate) tasks: TaskCollection,
    pub(crate) results: ResultHolder,
    pub(crate) compose: String,
    pub(crate) notice: Option<Notice>,
    pub(crate) pending_mutations: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// User-visible message raised by the most recent operation.
#[derive(Debug, Clone)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new("Done", message, NoticeKind::Info)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, NoticeKind::Error)
    }

    fn new(title: impl Into<String>, message: impl Into<String>, kind: NoticeKind) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// Progress flags, one per gated operation class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusyFlags {
    pub loading: bool,
    pub searching: bool,
    pub suggesting: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Updated { completed: bool },
    /// The id was not in the collection; nothing was sent.
    NotFound,
}

/// Confirmation token for deleting a task.
///
/// Only [`Orchestrator::request_delete`](super::Orchestrator::request_delete)
/// hands these out, so a delete cannot reach the server without passing
/// through the confirmation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub(crate) id: TaskId,
    pub(crate) text: String,
}

impl PendingDelete {
    pub fn id(&self) -> &TaskId {
        &self.id
    }

    /// Text of the task at the time confirmation was requested.
    pub fn text(&self) -> &str {
        &self.text
    }
}
