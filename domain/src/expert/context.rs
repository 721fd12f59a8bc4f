//! Round context handed to an expert.

use crate::core::mode::{RoundMode, RoutingLabel};
use crate::deliberation::state::{Message, OrchestratorState};

/// Everything an expert sees when gating or answering.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpertContext {
    pub query: String,
    pub history: Vec<Message>,
    pub summary: String,
    pub goal: String,
    pub mode: RoundMode,
    pub routing_label: RoutingLabel,
    /// Accumulated hint for this expert's role; empty when none
    pub hint: String,
}

impl ExpertContext {
    /// Context for `role` built from the current state.
    pub fn from_state(
        query: &str,
        state: &OrchestratorState,
        routing_label: RoutingLabel,
        role: &str,
    ) -> Self {
        Self {
            query: query.to_string(),
            history: state.history().to_vec(),
            summary: state.summary().to_string(),
            goal: state.goal().to_string(),
            mode: state.mode(),
            routing_label,
            hint: state.hint_for(role).to_string(),
        }
    }

    /// Same context with a different role hint.
    pub fn with_hint(&self, hint: impl Into<String>) -> Self {
        Self {
            hint: hint.into(),
            ..self.clone()
        }
    }
}
