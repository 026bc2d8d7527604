use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// Server-assigned task identifier, normalised to its string form.
///
/// The backend emits integer ids while the rest of the client compares ids as
/// strings, so both JSON numbers and strings deserialise into the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for TaskId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl PartialEq<str> for TaskId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TaskId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TaskIdVisitor;

        impl<'de> Visitor<'de> for TaskIdVisitor {
            type Value = TaskId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a task id as a string or integer")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<TaskId, E> {
                Ok(TaskId::from(value))
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<TaskId, E> {
                Ok(TaskId(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<TaskId, E> {
                Ok(TaskId(value.to_string()))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<TaskId, E> {
                Ok(TaskId(value.to_string()))
            }
        }

        deserializer.deserialize_any(TaskIdVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, text: impl Into<String>, completed: bool) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            completed,
        }
    }
}

/// A single ranked match returned by semantic search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: TaskId,
    pub text: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTaskRequest<'a> {
    pub text: &'a str,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionUpdate {
    pub completed: bool,
}

/// Acknowledgement body of an update; the backend echoes the stored record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAck {
    #[serde(default)]
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuggestionRequest<'a> {
    pub tasks: &'a [String],
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionResponse {
    pub suggestions: Vec<String>,
}
