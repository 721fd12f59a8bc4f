//! Expert descriptor value object

use crate::core::mode::{RoundMode, RoutingLabel};
use crate::expert::role::normalize_role_key;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weight applied when an expert has no entry for the current mode.
pub const DEFAULT_MODE_WEIGHT: f64 = 1.0;

/// Static description of one expert on the panel (Value Object)
///
/// The `name` doubles as the candidate label shown to the judge, and its
/// normalized form is the key of the expert's hint accumulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpertDescriptor {
    name: String,
    persona: String,
    weights: BTreeMap<RoundMode, f64>,
    affinity: Option<RoutingLabel>,
}

impl ExpertDescriptor {
    pub fn new(name: impl Into<String>, persona: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            persona: persona.into(),
            weights: BTreeMap::new(),
            affinity: None,
        }
    }

    /// Set the weight for one mode. Negative weights are clamped to zero.
    pub fn with_weight(mut self, mode: RoundMode, weight: f64) -> Self {
        self.weights.insert(mode, weight.max(0.0));
        self
    }

    /// Routing label this expert is most suited to; used for ordering only.
    pub fn with_affinity(mut self, label: RoutingLabel) -> Self {
        self.affinity = Some(label);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn affinity(&self) -> Option<RoutingLabel> {
        self.affinity
    }

    /// Key of this expert's hint accumulator
    pub fn role_key(&self) -> String {
        normalize_role_key(&self.name)
    }

    pub fn weight(&self, mode: RoundMode) -> f64 {
        self.weights
            .get(&mode)
            .copied()
            .unwrap_or(DEFAULT_MODE_WEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_defaults_to_one() {
        let expert = ExpertDescriptor::new("Analyst", "rigorous");
        assert_eq!(expert.weight(RoundMode::Explore), DEFAULT_MODE_WEIGHT);
    }

    #[test]
    fn test_weight_per_mode() {
        let expert = ExpertDescriptor::new("Critic", "adversarial")
            .with_weight(RoundMode::Attack, 1.3)
            .with_weight(RoundMode::Explore, -2.0);
        assert_eq!(expert.weight(RoundMode::Attack), 1.3);
        assert_eq!(expert.weight(RoundMode::Explore), 0.0);
        assert_eq!(expert.weight(RoundMode::Verify), 1.0);
    }

    #[test]
    fn test_role_key() {
        let expert = ExpertDescriptor::new("Synthesizer", "");
        assert_eq!(expert.role_key(), "synthesizer");
    }
}
