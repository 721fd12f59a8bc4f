//! Session status values.

use crate::deliberation::meta::StopLabel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a deliberation session stands.
///
/// `Running` is the only non-terminal status. A session reaches exactly one
/// terminal status per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Running,
    StoppedTruth,
    StoppedContradiction,
    StoppedMaxRounds,
    /// A later round failed; the result comes from the last completed round.
    StoppedRoundFailed,
}

impl SessionStatus {
    /// Status implied by a meta-critic stop label.
    pub fn from_stop_label(label: StopLabel) -> Self {
        match label {
            StopLabel::Continue => SessionStatus::Running,
            StopLabel::IrreducibleTruth => SessionStatus::StoppedTruth,
            StopLabel::Contradiction => SessionStatus::StoppedContradiction,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionStatus::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Running => "running",
            SessionStatus::StoppedTruth => "stopped_truth",
            SessionStatus::StoppedContradiction => "stopped_contradiction",
            SessionStatus::StoppedMaxRounds => "stopped_max_rounds",
            SessionStatus::StoppedRoundFailed => "stopped_round_failed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_stop_label() {
        assert_eq!(
            SessionStatus::from_stop_label(StopLabel::Continue),
            SessionStatus::Running
        );
        assert_eq!(
            SessionStatus::from_stop_label(StopLabel::IrreducibleTruth),
            SessionStatus::StoppedTruth
        );
        assert_eq!(
            SessionStatus::from_stop_label(StopLabel::Contradiction),
            SessionStatus::StoppedContradiction
        );
    }

    #[test]
    fn test_terminal() {
        assert!(!SessionStatus::Running.is_terminal());
        assert!(SessionStatus::StoppedMaxRounds.is_terminal());
        assert!(SessionStatus::StoppedRoundFailed.is_terminal());
    }

    #[test]
    fn test_serialize_snake_case() {
        let json = serde_json::to_string(&SessionStatus::StoppedMaxRounds).unwrap();
        assert_eq!(json, "\"stopped_max_rounds\"");
    }
}
