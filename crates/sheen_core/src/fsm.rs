//! State Machine Runtime
//!
//! Flat state machines described by an explicit transition table.
//! Supports:
//! - Typed states and events (any `Copy + Eq` type)
//! - Transition history
//! - Rejection of events with no matching transition
//!
//! Side effects are not stored in the machine. Callers inspect the result of
//! [`StateMachine::send`] and run their entry/exit work themselves, so all
//! mutable state stays owned by the caller instead of being captured in
//! closures.

use smallvec::SmallVec;

/// Most recent transitions kept in history; older ones are dropped
pub const HISTORY_LIMIT: usize = 32;

/// `from --event--> to`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition<S, E> {
    pub from_state: S,
    pub event: E,
    pub to_state: S,
}

impl<S, E> Transition<S, E> {
    pub fn new(from: S, event: E, to: S) -> Self {
        Self {
            from_state: from,
            event,
            to_state: to,
        }
    }
}

/// Collects transitions before the machine is built
pub struct StateMachineBuilder<S, E> {
    initial_state: S,
    transitions: Vec<Transition<S, E>>,
}

impl<S: Copy + Eq, E: Copy + Eq> StateMachineBuilder<S, E> {
    pub fn new(initial_state: S) -> Self {
        Self {
            initial_state,
            transitions: Vec::new(),
        }
    }

    /// Add a transition (from, event, to)
    pub fn on(mut self, from: S, event: E, to: S) -> Self {
        self.transitions.push(Transition::new(from, event, to));
        self
    }

    pub fn build(self) -> StateMachine<S, E> {
        StateMachine::new(self.initial_state, self.transitions)
    }
}

/// Running machine: current state plus its transition table
#[derive(Clone, Debug)]
pub struct StateMachine<S, E> {
    current_state: S,
    transitions: Vec<Transition<S, E>>,
    history: SmallVec<[(S, E, S); 8]>,
}

impl<S: Copy + Eq, E: Copy + Eq> StateMachine<S, E> {
    pub fn new(initial_state: S, transitions: Vec<Transition<S, E>>) -> Self {
        Self {
            current_state: initial_state,
            transitions,
            history: SmallVec::new(),
        }
    }

    pub fn builder(initial_state: S) -> StateMachineBuilder<S, E> {
        StateMachineBuilder::new(initial_state)
    }

    pub fn current_state(&self) -> S {
        self.current_state
    }

    pub fn is_in(&self, state: S) -> bool {
        self.current_state == state
    }

    /// The last [`HISTORY_LIMIT`] transitions, oldest first
    pub fn history(&self) -> &[(S, E, S)] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Whether `event` would fire a transition right now
    pub fn can_send(&self, event: E) -> bool {
        self.find(event).is_some()
    }

    /// Send an event, returning the new state if a transition fired.
    ///
    /// Events without a matching transition leave the machine untouched and
    /// return `None`.
    pub fn send(&mut self, event: E) -> Option<S> {
        let from = self.current_state;
        let to = self.find(event)?.to_state;

        self.current_state = to;
        if self.history.len() == HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push((from, event, to));
        Some(to)
    }

    fn find(&self, event: E) -> Option<&Transition<S, E>> {
        let current = self.current_state;
        self.transitions
            .iter()
            .find(|t| t.from_state == current && t.event == event)
    }
}
