//! Per-class re-entrancy guard for asynchronous operations.

use std::fmt;

use parking_lot::Mutex;

/// Operation classes that may only have one request in flight at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationClass {
    Load,
    Search,
    Suggest,
}

impl OperationClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationClass::Load => "load",
            OperationClass::Search => "search",
            OperationClass::Suggest => "suggestion",
        }
    }
}

impl fmt::Display for OperationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Idle,
    InFlight,
}

/// Two-state machine: `Idle -> InFlight` on start, back to `Idle` when the
/// returned guard drops.
#[derive(Debug)]
pub struct OperationGate {
    class: OperationClass,
    state: Mutex<GateState>,
}

impl OperationGate {
    pub fn new(class: OperationClass) -> Self {
        Self {
            class,
            state: Mutex::new(GateState::Idle),
        }
    }

    pub fn class(&self) -> OperationClass {
        self.class
    }

    /// Enter `InFlight`, or `None` if a request of this class is already pending.
    pub fn try_start(&self) -> Option<GateGuard<'_>> {
        let mut state = self.state.lock();
        match *state {
            GateState::InFlight => None,
            GateState::Idle => {
                *state = GateState::InFlight;
                tracing::trace!(class = self.class.as_str(), "gate entered in-flight");
                Some(GateGuard { gate: self })
            }
        }
    }

    pub fn state(&self) -> GateState {
        *self.state.lock()
    }

    pub fn is_busy(&self) -> bool {
        self.state() == GateState::InFlight
    }
}

/// Holds a gate in `InFlight`; settles it on drop, whichever way the
/// operation ended.
#[must_use = "dropping the guard immediately settles the gate"]
#[derive(Debug)]
pub struct GateGuard<'a> {
    gate: &'a OperationGate,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        *self.gate.state.lock() = GateState::Idle;
        tracing::trace!(class = self.gate.class.as_str(), "gate settled");
    }
}
