//! Judge verdict types.

use serde::{Deserialize, Serialize};

/// One expert's answer for the round, labeled for the judge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpertAnswer {
    /// Candidate label (the expert's name)
    pub expert_name: String,
    pub text: String,
}

impl ExpertAnswer {
    pub fn new(expert_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            expert_name: expert_name.into(),
            text: text.into(),
        }
    }
}

/// Judge output as it arrives from a collaborator, before normalization.
///
/// Every field may be empty or malformed; [`crate::judge::normalize_verdict`]
/// turns this into a [`JudgeVerdict`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawJudgeOutput {
    pub best_label: String,
    /// Labels best-to-worst separated by `>`
    pub rankings: String,
    pub rationale: String,
    /// Full unstructured judge text, if the collaborator has one
    pub raw_text: Option<String>,
}

/// Which rung of the judge degradation ladder produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictSource {
    /// Primary call with a usable structured ranking
    Primary,
    /// Ranking recovered from a `>`-separated list in the judge text
    ParsedRanking,
    /// Only a best label was usable; ranking is that label alone
    BestLabelOnly,
    /// Primary call failed; the simpler comparison call answered
    Alternate,
}

/// Normalized judge verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeVerdict {
    pub best_label: String,
    /// Best → worst; only labels from the round's candidate set
    pub ranking: Vec<String>,
    pub rationale: String,
    /// Labeled candidate block sent to the judge, kept for diagnostics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    pub source: VerdictSource,
    /// Problems found while normalizing (rejected rankings, unknown labels)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
}

impl JudgeVerdict {
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Index of the winning candidate in execution order.
    ///
    /// `best_label` if it names a candidate, else the first ranking entry,
    /// else the first candidate. Always returns a valid index for a
    /// non-empty candidate list.
    pub fn winner_index(&self, labels: &[String]) -> usize {
        let position = |label: &str| labels.iter().position(|l| l == label);

        if !self.best_label.is_empty()
            && let Some(idx) = position(&self.best_label)
        {
            return idx;
        }

        self.ranking
            .first()
            .and_then(|label| position(label))
            .unwrap_or(0)
    }
}
