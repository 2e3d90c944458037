//! Visual state store
//!
//! Listeners run synchronously after the mutation is complete and see the
//! new state together with the action that produced it. A listener cannot
//! reach back into the store while it runs; anything it wants to change is
//! dispatched by the caller afterwards.

use std::collections::BTreeMap;

use tracing::trace;

use crate::{StoreAction, VisualState};

/// Listener registration id
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Store observer
pub type Listener = Box<dyn FnMut(&VisualState, &StoreAction)>;

/// The single shared visual state and its observers
pub struct VisualStore {
    state: VisualState,
    revision: u64,
    listeners: BTreeMap<ListenerId, Listener>,
    next_listener: u64,
}

impl VisualStore {
    pub fn new() -> Self {
        Self::with_state(VisualState::default())
    }

    pub fn with_state(state: VisualState) -> Self {
        VisualStore {
            state,
            revision: 0,
            listeners: BTreeMap::new(),
            next_listener: 0,
        }
    }

    /// Current state
    pub fn snapshot(&self) -> &VisualState {
        &self.state
    }

    /// Number of actions that changed the state so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply an action, then notify listeners if it changed anything
    pub fn dispatch(&mut self, action: StoreAction) -> bool {
        let changed = self.state.apply(&action);
        if !changed {
            trace!(action = action.name(), "store action without effect");
            return false;
        }

        self.revision += 1;
        trace!(action = action.name(), revision = self.revision, "store updated");
        for listener in self.listeners.values_mut() {
            listener(&self.state, &action);
        }
        true
    }

    /// Register a listener, called in registration order
    pub fn subscribe(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(id, listener);
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for VisualStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VisualStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisualStore")
            .field("state", &self.state)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
