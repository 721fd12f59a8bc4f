//! Best-effort hint persistence around a session.

use crate::ports::hint_store::HintStore;
use deliberate_domain::OrchestratorState;
use tracing::{debug, warn};

/// Seed `state` with previously saved hints. Returns whether anything was loaded.
pub fn restore_hints(store: &dyn HintStore, state: &mut OrchestratorState) -> bool {
    match store.load() {
        Ok(Some(snapshot)) if !snapshot.is_empty() => {
            debug!(
                "Loaded hints for {} roles",
                snapshot.expert_hints.values().filter(|h| !h.is_empty()).count()
            );
            state.absorb_snapshot(snapshot);
            true
        }
        Ok(_) => false,
        Err(e) => {
            warn!("Could not load hints, starting fresh: {}", e);
            false
        }
    }
}

/// Save the state's hints. Returns whether the save succeeded.
pub fn save_hints(store: &dyn HintStore, state: &OrchestratorState) -> bool {
    match store.save(&state.hint_snapshot()) {
        Ok(()) => true,
        Err(e) => {
            warn!("Could not save hints: {}", e);
            false
        }
    }
}
