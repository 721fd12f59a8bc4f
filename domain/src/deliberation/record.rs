//! Per-round records and the append-only trace.

use crate::core::mode::{RoundMode, RoutingLabel};
use crate::deliberation::meta::MetaEvaluation;
use crate::judge::verdict::{ExpertAnswer, VerdictSource};
use serde::{Deserialize, Serialize};

/// Everything that happened in one completed round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// 1-based round index within the session
    pub round: u32,
    pub mode: RoundMode,
    pub goal: String,
    pub routing_label: RoutingLabel,
    /// Answers in execution order
    pub candidates: Vec<ExpertAnswer>,
    /// Name of the winning expert; always one of `candidates`
    pub winner: String,
    pub ranking: Vec<String>,
    pub judge_rationale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub judge_payload: Option<String>,
    pub verdict_source: VerdictSource,
    pub meta: MetaEvaluation,
    /// Rolling summary after this round
    pub summary: String,
}

impl RoundRecord {
    /// Text of the winning answer.
    pub fn winning_answer(&self) -> &str {
        self.candidates
            .iter()
            .find(|c| c.expert_name == self.winner)
            .map(|c| c.text.as_str())
            .unwrap_or("")
    }
}

/// Append-only sequence of round records for one query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace(Vec<RoundRecord>);

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: RoundRecord) {
        self.0.push(record);
    }

    pub fn records(&self) -> &[RoundRecord] {
        &self.0
    }

    pub fn last(&self) -> Option<&RoundRecord> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoundRecord> {
        self.0.iter()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::deliberation::meta::MetaEvaluation;

    pub fn record(round: u32, winner: &str) -> RoundRecord {
        RoundRecord {
            round,
            mode: RoundMode::Verify,
            goal: "g".to_string(),
            routing_label: RoutingLabel::Analytic,
            candidates: vec![
                ExpertAnswer::new("Analyst", "analysis"),
                ExpertAnswer::new("Critic", "critique"),
            ],
            winner: winner.to_string(),
            ranking: vec![winner.to_string()],
            judge_rationale: String::new(),
            judge_payload: None,
            verdict_source: VerdictSource::Primary,
            meta: MetaEvaluation::conservative(),
            summary: String::new(),
        }
    }
}
