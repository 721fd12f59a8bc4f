//! Gating: per-expert respond/confidence decisions and the candidate filter.
//!
//! Every registry expert is asked whether it should answer this round. The
//! decisions are turned into [`ScoredCandidate`]s by [`gated_candidates`],
//! which applies the `gate_min_conf` threshold and the single-expert
//! fallback so the pipeline never runs with zero candidates.

use crate::core::error::DomainError;
use crate::core::mode::RoundMode;
use crate::expert::registry::ExpertRegistry;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// An expert's self-assessed fitness for the current query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateDecision {
    pub respond: bool,
    pub confidence: f64,
    pub coverage_tags: BTreeSet<String>,
}

impl GateDecision {
    /// Build a validated decision. Confidence must be a finite value in `[0, 1]`.
    pub fn new(
        respond: bool,
        confidence: f64,
        coverage_tags: BTreeSet<String>,
    ) -> Result<Self, DomainError> {
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return Err(DomainError::malformed(
                "confidence",
                format!("{} is outside [0, 1]", confidence),
            ));
        }
        Ok(Self {
            respond,
            confidence,
            coverage_tags,
        })
    }

    /// The decision an expert is degraded to when its gate call fails.
    pub fn decline() -> Self {
        Self {
            respond: false,
            confidence: 0.0,
            coverage_tags: BTreeSet::new(),
        }
    }

    /// Whether this decision admits the expert at the given threshold.
    pub fn passes(&self, gate_min_conf: f64) -> bool {
        self.respond && self.confidence >= gate_min_conf
    }
}

/// Split a comma-separated tag list into a normalized set.
pub fn parse_coverage_tags(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(|t| t.trim().trim_matches(|c| c == '"' || c == '\'').to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Gate decision attributed to one registry expert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateResult {
    pub expert: String,
    pub decision: GateDecision,
}

impl GateResult {
    pub fn new(expert: impl Into<String>, decision: GateDecision) -> Self {
        Self {
            expert: expert.into(),
            decision,
        }
    }
}

/// A gated expert ready for selection.
///
/// `score = confidence × weight(expert, mode)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub expert: String,
    pub score: f64,
    pub tags: BTreeSet<String>,
    pub hint: String,
}

/// Turn gate results into scored candidates.
///
/// Results keep their input order (which the selector uses for tie-breaks).
/// Results naming experts absent from the registry are ignored. When no
/// expert passes, the first registry expert is returned alone with a
/// synthetic full-confidence score and empty tags.
pub fn gated_candidates(
    registry: &ExpertRegistry,
    results: &[GateResult],
    mode: RoundMode,
    gate_min_conf: f64,
    hints: &BTreeMap<String, String>,
) -> Vec<ScoredCandidate> {
    let hint_for = |role: &str| hints.get(role).cloned().unwrap_or_default();

    let candidates: Vec<ScoredCandidate> = results
        .iter()
        .filter(|r| r.decision.passes(gate_min_conf))
        .filter_map(|r| {
            let expert = registry.get(&r.expert)?;
            Some(ScoredCandidate {
                expert: expert.name().to_string(),
                score: r.decision.confidence * expert.weight(mode),
                tags: r.decision.coverage_tags.clone(),
                hint: hint_for(&expert.role_key()),
            })
        })
        .collect();

    if !candidates.is_empty() {
        return candidates;
    }

    let fallback = registry.first();
    vec![ScoredCandidate {
        expert: fallback.name().to_string(),
        score: 1.0,
        tags: BTreeSet::new(),
        hint: hint_for(&fallback.role_key()),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expert::descriptor::ExpertDescriptor;

    fn tags(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn yes(expert: &str, confidence: f64, t: &[&str]) -> GateResult {
        GateResult::new(expert, GateDecision::new(true, confidence, tags(t)).unwrap())
    }

    fn no(expert: &str, confidence: f64) -> GateResult {
        GateResult::new(expert, GateDecision::new(false, confidence, tags(&[])).unwrap())
    }

    fn registry() -> ExpertRegistry {
        ExpertRegistry::new(vec![
            ExpertDescriptor::new("Analyst", "").with_weight(RoundMode::Verify, 1.5),
            ExpertDescriptor::new("Critic", ""),
            ExpertDescriptor::new("Synth", ""),
        ])
        .unwrap()
    }

    #[test]
    fn test_confidence_out_of_range_is_malformed() {
        assert!(GateDecision::new(true, 1.2, tags(&[])).is_err());
        assert!(GateDecision::new(true, -0.1, tags(&[])).is_err());
        assert!(GateDecision::new(true, f64::NAN, tags(&[])).is_err());
        assert!(GateDecision::new(true, 1.0, tags(&[])).is_ok());
    }

    #[test]
    fn test_parse_coverage_tags() {
        assert_eq!(
            parse_coverage_tags(" Physics, math ,, \"Proofs\" "),
            tags(&["math", "physics", "proofs"])
        );
        assert!(parse_coverage_tags("").is_empty());
    }

    #[test]
    fn test_score_is_confidence_times_mode_weight() {
        let results = vec![yes("Analyst", 0.6, &["x"]), yes("Critic", 0.5, &["y"])];
        let candidates =
            gated_candidates(&registry(), &results, RoundMode::Verify, 0.0, &BTreeMap::new());
        assert_eq!(candidates.len(), 2);
        assert!((candidates[0].score - 0.9).abs() < 1e-9);
        assert!((candidates[1].score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_respond_no_excluded_even_with_high_confidence() {
        let results = vec![no("Analyst", 0.99), yes("Critic", 0.4, &[])];
        let candidates =
            gated_candidates(&registry(), &results, RoundMode::Verify, 0.0, &BTreeMap::new());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].expert, "Critic");
    }

    #[test]
    fn test_below_threshold_excluded_despite_yes() {
        let results = vec![yes("Analyst", 0.2, &[]), yes("Critic", 0.7, &[])];
        let candidates =
            gated_candidates(&registry(), &results, RoundMode::Verify, 0.5, &BTreeMap::new());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].expert, "Critic");
    }

    #[test]
    fn test_fallback_to_first_expert_when_none_pass() {
        let results = vec![no("Analyst", 0.9), no("Critic", 0.9), no("Synth", 0.1)];
        let mut hints = BTreeMap::new();
        hints.insert("analyst".to_string(), "be brief".to_string());
        let candidates = gated_candidates(&registry(), &results, RoundMode::Verify, 0.3, &hints);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].expert, "Analyst");
        assert_eq!(candidates[0].score, 1.0);
        assert!(candidates[0].tags.is_empty());
        assert_eq!(candidates[0].hint, "be brief");
    }

    #[test]
    fn test_threshold_is_monotonic() {
        let results = vec![
            yes("Analyst", 0.15, &[]),
            yes("Critic", 0.45, &[]),
            yes("Synth", 0.8, &[]),
            no("Analyst", 0.95),
        ];
        let mut previous = usize::MAX;
        for step in 0..=10 {
            let threshold = step as f64 / 10.0;
            let count = gated_candidates(
                &registry(),
                &results,
                RoundMode::Verify,
                threshold,
                &BTreeMap::new(),
            )
            .len();
            assert!(count <= previous, "threshold {} increased count", threshold);
            assert!(count >= 1);
            previous = count;
        }
    }

    #[test]
    fn test_unknown_expert_ignored() {
        let results = vec![yes("Oracle", 0.9, &[]), yes("Critic", 0.5, &[])];
        let candidates =
            gated_candidates(&registry(), &results, RoundMode::Verify, 0.0, &BTreeMap::new());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].expert, "Critic");
    }
}
