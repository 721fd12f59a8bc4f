//! Result of deliberating one query.

use crate::core::mode::{RoundMode, RoutingLabel};
use crate::deliberation::record::Trace;
use crate::deliberation::status::SessionStatus;
use serde::{Deserialize, Serialize};

/// Final answer plus the full round trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationOutcome {
    pub query: String,
    /// Winning answer of the last completed round
    pub answer: String,
    pub winner: String,
    pub rationale: String,
    pub routing_label: RoutingLabel,
    pub goal: String,
    pub mode: RoundMode,
    /// Rounds completed for this query
    pub rounds: u32,
    pub summary: String,
    pub status: SessionStatus,
    pub trace: Trace,
}

impl DeliberationOutcome {
    /// Build the outcome from a finished trace.
    ///
    /// Returns `None` when the trace is empty; a successful query always
    /// completes at least one round.
    pub fn from_trace(query: impl Into<String>, trace: Trace, status: SessionStatus) -> Option<Self> {
        let last = trace.last()?;
        Some(Self {
            query: query.into(),
            answer: last.winning_answer().to_string(),
            winner: last.winner.clone(),
            rationale: last.judge_rationale.clone(),
            routing_label: last.routing_label,
            goal: last.goal.clone(),
            mode: last.mode,
            rounds: trace.len() as u32,
            summary: last.summary.clone(),
            status,
            trace,
        })
    }
}
