//! Contract for the remote task service and its implementations.

mod http;
mod memory;

pub use http::HttpTodoApi;
pub use memory::{ApiCall, Endpoint, InMemoryTodoApi};

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{SearchHit, Task, TaskId};

/// Errors raised while talking to the remote task service.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server responded with status {status}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        ApiError::Status {
            status,
            body: body.into(),
        }
    }
}

/// Operations the remote task service exposes.
///
/// Implementations perform exactly one round-trip per call and never retry.
#[async_trait]
pub trait TodoApi: Send + Sync {
    /// `GET /todos/`
    async fn list(&self) -> Result<Vec<Task>, ApiError>;

    /// `POST /todos/`; the server assigns the id.
    async fn create(&self, text: &str) -> Result<Task, ApiError>;

    /// `PUT /todos/{id}`; returns the `completed` value the server echoed, if any.
    async fn update_completed(&self, id: &TaskId, completed: bool)
        -> Result<Option<bool>, ApiError>;

    /// `DELETE /todos/{id}`
    async fn delete(&self, id: &TaskId) -> Result<(), ApiError>;

    /// `POST /todos/search`
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ApiError>;

    /// `POST /todos/suggest`
    async fn suggest(&self, tasks: &[String]) -> Result<Vec<String>, ApiError>;

    /// `GET /`
    async fn health(&self) -> Result<(), ApiError>;
}
