//! Expert registry: the fixed-order panel of experts for a session.

use crate::core::error::DomainError;
use crate::core::mode::{RoundMode, RoutingLabel};
use crate::expert::descriptor::ExpertDescriptor;
use std::collections::HashSet;

/// Immutable, fixed-order list of experts.
///
/// Order matters in two places: the gating fallback always picks the first
/// registered expert, and the selector breaks score ties by encounter order.
#[derive(Debug, Clone)]
pub struct ExpertRegistry {
    experts: Vec<ExpertDescriptor>,
}

impl ExpertRegistry {
    /// Build a registry. Fails when empty or when two experts share a role key.
    pub fn new(experts: Vec<ExpertDescriptor>) -> Result<Self, DomainError> {
        if experts.is_empty() {
            return Err(DomainError::InvalidConfiguration(
                "expert registry cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for expert in &experts {
            if !seen.insert(expert.role_key()) {
                return Err(DomainError::InvalidConfiguration(format!(
                    "duplicate expert name: {}",
                    expert.name()
                )));
            }
        }

        Ok(Self { experts })
    }

    /// The default eight-member panel.
    pub fn default_panel() -> Self {
        use RoundMode::*;

        let experts = vec![
            ExpertDescriptor::new(
                "Analyst",
                "Terse and rigorous. Prefers definitions, equations and explicit claims.",
            )
            .with_weight(Verify, 1.2)
            .with_weight(Plan, 1.0)
            .with_weight(Explore, 0.8)
            .with_affinity(RoutingLabel::Analytic),
            ExpertDescriptor::new(
                "Synthesizer",
                "Concrete high-signal bullets. Produces distinct options and prunes repetition.",
            )
            .with_weight(Explore, 1.3)
            .with_weight(Verify, 0.9)
            .with_affinity(RoutingLabel::Creative),
            ExpertDescriptor::new(
                "Critic",
                "Adversarial but fair red-teamer. Enumerates failure modes and kill-shots.",
            )
            .with_weight(Attack, 1.3)
            .with_weight(Verify, 1.1)
            .with_weight(Explore, 0.8)
            .with_affinity(RoutingLabel::Critical),
            ExpertDescriptor::new(
                "Planner",
                "Turns goals into ordered, testable steps with owners and checkpoints.",
            )
            .with_weight(Plan, 1.3)
            .with_weight(Attack, 0.7)
            .with_affinity(RoutingLabel::Plan),
            ExpertDescriptor::new(
                "Empiricist",
                "Asks what evidence would settle the question and how to measure it.",
            )
            .with_weight(Verify, 1.2)
            .with_weight(Attack, 1.0)
            .with_affinity(RoutingLabel::Analytic),
            ExpertDescriptor::new(
                "Theorist",
                "Builds first-principles models and checks internal consistency.",
            )
            .with_weight(Explore, 1.1)
            .with_weight(Verify, 1.0)
            .with_affinity(RoutingLabel::Analytic),
            ExpertDescriptor::new(
                "Historian",
                "Looks for precedent, prior art and how similar efforts played out.",
            )
            .with_weight(Explore, 1.0)
            .with_weight(Plan, 0.8)
            .with_affinity(RoutingLabel::Creative),
            ExpertDescriptor::new(
                "Pragmatist",
                "Weighs cost, risk and reversibility; favours the smallest safe next step.",
            )
            .with_weight(Plan, 1.2)
            .with_weight(Attack, 0.9)
            .with_affinity(RoutingLabel::Plan),
        ];

        Self { experts }
    }

    pub fn len(&self) -> usize {
        self.experts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.experts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExpertDescriptor> {
        self.experts.iter()
    }

    /// First registered expert; the gating fallback.
    pub fn first(&self) -> &ExpertDescriptor {
        &self.experts[0]
    }

    /// Look up an expert by name (case-insensitive, aliases resolved).
    pub fn get(&self, name: &str) -> Option<&ExpertDescriptor> {
        let key = crate::expert::role::normalize_role_key(name);
        self.experts.iter().find(|e| e.role_key() == key)
    }

    /// Role keys of every expert, in registry order.
    pub fn role_keys(&self) -> Vec<String> {
        self.experts.iter().map(|e| e.role_key()).collect()
    }

    /// Experts ordered for a routing label: those with a matching affinity
    /// first, registry order preserved within each group.
    pub fn ordered_for(&self, label: RoutingLabel) -> Vec<&ExpertDescriptor> {
        let (matching, rest): (Vec<_>, Vec<_>) = self
            .experts
            .iter()
            .partition(|e| e.affinity() == Some(label));
        matching.into_iter().chain(rest).collect()
    }
}

impl Default for ExpertRegistry {
    fn default() -> Self {
        Self::default_panel()
    }
}
