//! The single in-memory collection of task records.

use std::collections::HashSet;

use crate::model::{Task, TaskId};

/// Ordered task records with unique ids.
///
/// Order is the server's list order after a load and append order after that.
/// Only the four mutation primitives below change the collection; reads hand
/// out clones so no caller can hold a reference into the storage.
#[derive(Debug, Clone, Default)]
pub struct TaskCollection {
    tasks: Vec<Task>,
}

impl TaskCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection.
    ///
    /// A repeated id keeps its first occurrence so uniqueness still holds when
    /// the server hands back a malformed list.
    pub fn load_all(&mut self, records: Vec<Task>) {
        let mut seen = HashSet::with_capacity(records.len());
        let mut tasks = Vec::with_capacity(records.len());
        for record in records {
            if seen.insert(record.id.clone()) {
                tasks.push(record);
            } else {
                tracing::warn!(task_id = %record.id, "dropping duplicate task id from list");
            }
        }
        self.tasks = tasks;
    }

    /// Append a record; a duplicate id is logged and ignored.
    pub fn insert(&mut self, record: Task) -> bool {
        if self.contains(&record.id) {
            tracing::warn!(task_id = %record.id, "server returned an id already in the collection");
            return false;
        }
        self.tasks.push(record);
        true
    }

    /// Set the completion flag of the matching record, if it is still present.
    pub fn set_completed(&mut self, id: &TaskId, completed: bool) -> bool {
        match self.tasks.iter_mut().find(|task| &task.id == id) {
            Some(task) => {
                task.completed = completed;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| &task.id != id);
        self.tasks.len() != before
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.tasks.iter().any(|task| &task.id == id)
    }

    pub fn get(&self, id: &TaskId) -> Option<Task> {
        self.tasks.iter().find(|task| &task.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.tasks.iter().map(|task| task.text.clone()).collect()
    }
}
