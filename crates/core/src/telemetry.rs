//! Lightweight in-process record of orchestrator activity, mirrored to tracing.

#[cfg(feature = "telemetry")]
use std::collections::VecDeque;

#[cfg(feature = "telemetry")]
use parking_lot::Mutex;

/// Events retained in memory; older entries are discarded first.
pub const MAX_EVENTS: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    LoadStarted,
    LoadCompleted { count: usize },
    TaskAdded { id: String, from_suggestion: bool },
    TaskToggled { id: String, completed: bool },
    TaskDeleted(String),
    SearchCompleted { hits: usize },
    SuggestionsReceived { count: usize },
    Rejected { operation: String, reason: String },
    Failed { operation: String, error: String },
}

#[derive(Debug)]
pub struct Handle {
    #[cfg(feature = "telemetry")]
    events: Mutex<VecDeque<Event>>,
}

impl Default for Handle {
    fn default() -> Self {
        Self::new()
    }
}

impl Handle {
    pub fn new() -> Self {
        Self {
            #[cfg(feature = "telemetry")]
            events: Mutex::new(VecDeque::with_capacity(MAX_EVENTS)),
        }
    }

    pub fn record(&self, event: Event) {
        #[cfg(feature = "telemetry")]
        {
            match &event {
                Event::LoadStarted => tracing::debug!("telemetry load started"),
                Event::LoadCompleted { count } => {
                    tracing::debug!(count, "telemetry load completed")
                }
                Event::TaskAdded {
                    id,
                    from_suggestion,
                } => tracing::debug!(
                    task_id = id.as_str(),
                    from_suggestion,
                    "telemetry task added"
                ),
                Event::TaskToggled { id, completed } => tracing::debug!(
                    task_id = id.as_str(),
                    completed,
                    "telemetry task toggled"
                ),
                Event::TaskDeleted(id) => {
                    tracing::debug!(task_id = id.as_str(), "telemetry task deleted")
                }
                Event::SearchCompleted { hits } => {
                    tracing::debug!(hits, "telemetry search completed")
                }
                Event::SuggestionsReceived { count } => {
                    tracing::debug!(count, "telemetry suggestions received")
                }
                Event::Rejected { operation, reason } => tracing::debug!(
                    operation = operation.as_str(),
                    reason = reason.as_str(),
                    "telemetry operation rejected"
                ),
                Event::Failed { operation, error } => tracing::debug!(
                    operation = operation.as_str(),
                    error = %error,
                    "telemetry operation failed"
                ),
            }
            let mut events = self.events.lock();
            if events.len() == MAX_EVENTS {
                events.pop_front();
            }
            events.push_back(event);
        }
        #[cfg(not(feature = "telemetry"))]
        {
            let _ = event;
        }
    }

    pub fn is_enabled(&self) -> bool {
        cfg!(feature = "telemetry")
    }

    /// The most recent events, oldest first, at most [`MAX_EVENTS`].
    /// Always empty with telemetry compiled out.
    pub fn events(&self) -> Vec<Event> {
        #[cfg(feature = "telemetry")]
        {
            self.events.lock().iter().cloned().collect()
        }
        #[cfg(not(feature = "telemetry"))]
        {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_events_when_enabled() {
        let handle = Handle::new();
        handle.record(Event::LoadCompleted { count: 2 });
        if handle.is_enabled() {
            assert_eq!(handle.events(), vec![Event::LoadCompleted { count: 2 }]);
        } else {
            assert!(handle.events().is_empty());
        }
    }

    #[test]
    fn keeps_only_the_newest_events() {
        let handle = Handle::new();
        for count in 0..MAX_EVENTS + 10 {
            handle.record(Event::LoadCompleted { count });
        }

        let events = handle.events();
        if handle.is_enabled() {
            assert_eq!(events.len(), MAX_EVENTS);
            assert_eq!(events.first(), Some(&Event::LoadCompleted { count: 10 }));
            assert_eq!(
                events.last(),
                Some(&Event::LoadCompleted {
                    count: MAX_EVENTS + 9
                })
            );
        } else {
            assert!(events.is_empty());
        }
    }
}
