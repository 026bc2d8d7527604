//! Request orchestration: one operation per user intent, applied to the task
//! collection and result holder only after the server confirms.

pub use self::operations::MIN_TASKS_FOR_SUGGESTIONS;
pub use self::orchestrator::Orchestrator;
pub use self::state::{BusyFlags, Notice, NoticeKind, PendingDelete, ToggleOutcome};

mod operations;
mod orchestrator;
mod state;
