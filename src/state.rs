use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::types::{InstanceId, RefreshState};

#[derive(Debug, Clone, Copy, Default)]
pub struct InstanceEntry {
    pub state: RefreshState,
    /// Bumped on every refresh; artwork tasks carry the value they were started with
    pub generation: u64,
}

/// Refresh state of every widget instance seen so far, shared with artwork tasks
pub type SharedState = Arc<RwLock<HashMap<InstanceId, InstanceEntry>>>;

pub fn create_state() -> SharedState {
    Arc::new(RwLock::new(HashMap::new()))
}

/// Unknown instances are `Idle`
pub fn state_of(state: &SharedState, id: InstanceId) -> RefreshState {
    state.read().get(&id).map(|e| e.state).unwrap_or_default()
}

/// Enter `Refreshing` and return the generation of this refresh
pub fn begin_refresh(state: &SharedState, id: InstanceId) -> u64 {
    let mut guard = state.write();
    let entry = guard.entry(id).or_default();
    let previous = entry.state;
    entry.generation += 1;
    entry.state = RefreshState::Refreshing;
    log::debug!("Widget {}: {:?} -> Refreshing (#{})", id, previous, entry.generation);
    entry.generation
}

/// Move to `next` unless a newer refresh has started since `generation`.
/// Returns whether the transition happened.
pub fn settle(state: &SharedState, id: InstanceId, generation: u64, next: RefreshState) -> bool {
    let mut guard = state.write();
    let entry = guard.entry(id).or_default();
    if entry.generation != generation {
        log::debug!(
            "Widget {}: stale refresh #{} ignored, #{} is current",
            id,
            generation,
            entry.generation
        );
        return false;
    }
    log::debug!("Widget {}: {:?} -> {:?}", id, entry.state, next);
    entry.state = next;
    true
}
