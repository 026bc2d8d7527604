//! The orchestrator instance: owned state, gates, and read accessors.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::api::{ApiError, HttpTodoApi, TodoApi};
use crate::config::ClientConfig;
use crate::gate::{OperationClass, OperationGate};
use crate::model::Task;
use crate::results::SearchResults;
use crate::telemetry;

use super::state::{BusyFlags, Notice, SyncState};

/// Coordinates user intents against the remote service and applies the
/// confirmed results to local state.
///
/// Every operation takes `&self`, so operations of different classes may be
/// awaited concurrently on one instance. The state lock is never held across
/// an `.await`, which keeps each mutation atomic from a reader's perspective.
pub struct Orchestrator {
    pub(super) api: Arc<dyn TodoApi>,
    pub(super) state: Mutex<SyncState>,
    pub(super) load_gate: OperationGate,
    pub(super) search_gate: OperationGate,
    pub(super) suggest_gate: OperationGate,
    pub(super) telemetry: telemetry::Handle,
}

impl Orchestrator {
    pub fn new(api: Arc<dyn TodoApi>) -> Self {
        Self {
            api,
            state: Mutex::new(SyncState::default()),
            load_gate: OperationGate::new(OperationClass::Load),
            search_gate: OperationGate::new(OperationClass::Search),
            suggest_gate: OperationGate::new(OperationClass::Suggest),
            telemetry: telemetry::Handle::new(),
        }
    }

    /// Build an orchestrator talking HTTP to the configured service.
    pub fn connect(config: &ClientConfig) -> Result<Self, ApiError> {
        let api = HttpTodoApi::new(config)?;
        tracing::debug!(api_url = %config.api_url(), "connecting to task service");
        Ok(Self::new(Arc::new(api)))
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().tasks.snapshot()
    }

    pub fn search_results(&self) -> SearchResults {
        self.state.lock().results.search()
    }

    pub fn suggestions(&self) -> Vec<String> {
        self.state.lock().results.suggestions()
    }

    pub fn compose_text(&self) -> String {
        self.state.lock().compose.clone()
    }

    pub fn set_compose_text(&self, text: impl Into<String>) {
        self.state.lock().compose = text.into();
    }

    pub fn busy(&self) -> BusyFlags {
        BusyFlags {
            loading: self.load_gate.is_busy(),
            searching: self.search_gate.is_busy(),
            suggesting: self.suggest_gate.is_busy(),
        }
    }

    pub fn notice(&self) -> Option<Notice> {
        self.state.lock().notice.clone()
    }

    /// Take the current notice, leaving none behind.
    pub fn take_notice(&self) -> Option<Notice> {
        self.state.lock().notice.take()
    }

    /// Create, toggle, and delete requests still awaiting a response.
    pub fn pending_mutations(&self) -> usize {
        self.state.lock().pending_mutations
    }

    pub fn close_search(&self) {
        self.state.lock().results.close_search();
    }

    pub fn telemetry(&self) -> &telemetry::Handle {
        &self.telemetry
    }

    pub(super) fn set_notice(&self, notice: Notice) {
        self.state.lock().notice = Some(notice);
    }

    pub(super) fn track_mutation(&self) -> MutationTicket<'_> {
        self.state.lock().pending_mutations += 1;
        MutationTicket { owner: self }
    }
}

/// Counts one in-flight mutation until dropped.
pub(super) struct MutationTicket<'a> {
    owner: &'a Orchestrator,
}

impl Drop for MutationTicket<'_> {
    fn drop(&mut self) {
        let mut state = self.owner.state.lock();
        state.pending_mutations = state.pending_mutations.saturating_sub(1);
    }
}
