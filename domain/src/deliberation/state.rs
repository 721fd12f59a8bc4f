//! Session state for the round state machine.

use crate::core::mode::RoundMode;
use crate::core::string::append_line;
use crate::deliberation::hints::HintSnapshot;
use crate::deliberation::meta::MetaEvaluation;
use crate::expert::registry::ExpertRegistry;
use crate::expert::role::normalize_role_key;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Goal used when the caller does not supply one.
pub const DEFAULT_GOAL: &str = "Reach irreducible truth or contradiction.";

/// Role of a history message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Mutable, single-owner session state.
///
/// Only the orchestrator mutates it, and only between rounds. The
/// orchestrator works on a clone during a round and commits it on success,
/// so a failed or cancelled round leaves this value untouched.
///
/// Invariants upheld by the mutators:
/// - `round_index` only ever increases, by exactly one per round
/// - hint accumulators are append-only; the old value is always a prefix of
///   the new one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorState {
    history: Vec<Message>,
    summary: String,
    goal: String,
    mode: RoundMode,
    router_guidance: String,
    expert_hints: BTreeMap<String, String>,
    round_index: u32,
}

impl Default for OrchestratorState {
    fn default() -> Self {
        Self {
            history: Vec::new(),
            summary: String::new(),
            goal: DEFAULT_GOAL.to_string(),
            mode: RoundMode::default(),
            router_guidance: String::new(),
            expert_hints: BTreeMap::new(),
            round_index: 0,
        }
    }
}

impl OrchestratorState {
    /// Fresh state with an empty hint slot for every registry expert.
    pub fn for_registry(registry: &ExpertRegistry) -> Self {
        let mut state = Self::default();
        for key in registry.role_keys() {
            state.expert_hints.insert(key, String::new());
        }
        state
    }

    // ==================== Accessors ====================

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn mode(&self) -> RoundMode {
        self.mode
    }

    pub fn router_guidance(&self) -> &str {
        &self.router_guidance
    }

    pub fn expert_hints(&self) -> &BTreeMap<String, String> {
        &self.expert_hints
    }

    /// Accumulated hint for a role (aliases resolved); empty when none.
    pub fn hint_for(&self, role: &str) -> &str {
        self.expert_hints
            .get(&normalize_role_key(role))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn round_index(&self) -> u32 {
        self.round_index
    }

    // ==================== Mutators ====================

    pub fn set_goal(&mut self, goal: impl Into<String>) {
        let goal = goal.into();
        if !goal.trim().is_empty() {
            self.goal = goal.trim().to_string();
        }
    }

    pub fn set_mode(&mut self, mode: RoundMode) {
        self.mode = mode;
    }

    /// Enter the next round; returns the new index.
    pub fn advance_round(&mut self) -> u32 {
        self.round_index += 1;
        self.round_index
    }

    pub fn replace_summary(&mut self, summary: impl Into<String>) {
        self.summary = summary.into();
    }

    /// Append the meta-critic's non-empty hints to the accumulators.
    pub fn apply_hints(&mut self, meta: &MetaEvaluation) {
        self.router_guidance = append_line(&self.router_guidance, &meta.router_hint);
        for (role, hint) in &meta.role_hints {
            let entry = self
                .expert_hints
                .entry(normalize_role_key(role))
                .or_default();
            *entry = append_line(entry, hint);
        }
    }

    /// Record the round's exchange: the query, then the winning answer.
    pub fn record_exchange(&mut self, query: &str, answer: &str) {
        self.history.push(Message::user(query));
        self.history.push(Message::assistant(answer));
    }

    // ==================== Persistence ====================

    /// Seed accumulators from a persisted snapshot.
    ///
    /// Loaded text is appended to whatever the state already holds, so the
    /// append-only invariant also covers loading.
    pub fn absorb_snapshot(&mut self, snapshot: HintSnapshot) {
        let snapshot = snapshot.normalized();
        self.router_guidance = append_line(&self.router_guidance, &snapshot.router_guidance);
        for (role, hint) in snapshot.expert_hints {
            let entry = self.expert_hints.entry(role).or_default();
            *entry = append_line(entry, &hint);
        }
    }

    pub fn hint_snapshot(&self) -> HintSnapshot {
        HintSnapshot {
            router_guidance: self.router_guidance.clone(),
            expert_hints: self.expert_hints.clone(),
        }
    }
}
