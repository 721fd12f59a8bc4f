//! Meta-critic evaluation of a completed round.

use crate::core::error::DomainError;
use crate::expert::role::normalize_role_key;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Meta-critic stop decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopLabel {
    #[default]
    Continue,
    IrreducibleTruth,
    Contradiction,
}

impl StopLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopLabel::Continue => "continue",
            StopLabel::IrreducibleTruth => "irreducible_truth",
            StopLabel::Contradiction => "contradiction",
        }
    }

    pub fn is_stop(&self) -> bool {
        !matches!(self, StopLabel::Continue)
    }
}

impl fmt::Display for StopLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StopLabel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "continue" => Ok(StopLabel::Continue),
            "irreducible_truth" => Ok(StopLabel::IrreducibleTruth),
            "contradiction" => Ok(StopLabel::Contradiction),
            _ => Err(DomainError::malformed(
                "stop_label",
                format!("'{}' is not one of continue | irreducible_truth | contradiction", s.trim()),
            )),
        }
    }
}

/// Round scores, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetaScores {
    pub route: f64,
    pub quality: f64,
    pub alignment: f64,
}

impl MetaScores {
    pub fn new(route: f64, quality: f64, alignment: f64) -> Result<Self, DomainError> {
        for (field, value) in [
            ("route_score", route),
            ("quality_score", quality),
            ("alignment_score", alignment),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(DomainError::malformed(
                    field,
                    format!("{} is outside [0, 1]", value),
                ));
            }
        }
        Ok(Self {
            route,
            quality,
            alignment,
        })
    }
}

/// Everything the meta-critic says about a round.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetaEvaluation {
    pub stop_label: StopLabel,
    pub scores: MetaScores,
    pub router_hint: String,
    /// Per-role hints keyed by normalized role key
    pub role_hints: BTreeMap<String, String>,
}

impl MetaEvaluation {
    pub fn new(stop_label: StopLabel, scores: MetaScores) -> Self {
        Self {
            stop_label,
            scores,
            router_hint: String::new(),
            role_hints: BTreeMap::new(),
        }
    }

    /// Used when the meta-critic is unavailable or malformed: keep going,
    /// no scores, no hints.
    pub fn conservative() -> Self {
        Self::default()
    }

    pub fn with_router_hint(mut self, hint: impl Into<String>) -> Self {
        self.router_hint = hint.into().trim().to_string();
        self
    }

    /// Add a per-role hint; blank hints are dropped.
    pub fn with_role_hint(mut self, role: &str, hint: impl Into<String>) -> Self {
        let hint = hint.into().trim().to_string();
        if !hint.is_empty() {
            self.role_hints.insert(normalize_role_key(role), hint);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_label_parse() {
        assert_eq!("continue".parse::<StopLabel>().unwrap(), StopLabel::Continue);
        assert_eq!(
            " Irreducible Truth ".parse::<StopLabel>().unwrap(),
            StopLabel::IrreducibleTruth
        );
        assert_eq!(
            "contradiction".parse::<StopLabel>().unwrap(),
            StopLabel::Contradiction
        );
        assert!("halt".parse::<StopLabel>().unwrap_err().is_malformed());
    }

    #[test]
    fn test_scores_validated() {
        assert!(MetaScores::new(0.0, 0.5, 1.0).is_ok());
        assert!(MetaScores::new(1.1, 0.5, 0.5).is_err());
        assert!(MetaScores::new(0.5, f64::NAN, 0.5).is_err());
    }

    #[test]
    fn test_conservative_continues_without_hints() {
        let meta = MetaEvaluation::conservative();
        assert_eq!(meta.stop_label, StopLabel::Continue);
        assert!(meta.router_hint.is_empty());
        assert!(meta.role_hints.is_empty());
    }

    #[test]
    fn test_role_hints_normalized_and_blank_dropped() {
        let meta = MetaEvaluation::conservative()
            .with_role_hint("Synth", "fewer options")
            .with_role_hint("critic", "   ");
        assert_eq!(meta.role_hints.get("synthesizer").unwrap(), "fewer options");
        assert!(!meta.role_hints.contains_key("critic"));
    }
}
