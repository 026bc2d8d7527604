pub mod api;
pub mod capture;
pub mod config;
pub mod error;
pub mod gate;
pub mod model;
pub mod results;
pub mod store;
pub mod sync;
pub mod telemetry;

pub use api::{ApiError, HttpTodoApi, InMemoryTodoApi, TodoApi};
pub use capture::{AddSource, ValidationError};
pub use config::{ClientConfig, ConfigOverrides};
pub use error::SyncError;
pub use gate::OperationClass;
pub use model::*;
pub use results::SearchResults;
pub use sync::{
    BusyFlags, Notice, NoticeKind, Orchestrator, PendingDelete, ToggleOutcome,
    MIN_TASKS_FOR_SUGGESTIONS,
};
