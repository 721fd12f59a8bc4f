//! Round mode and routing label definitions.
//!
//! - [`RoundMode`] - the user-selected reasoning posture for a session
//!   (`explore | verify | attack | plan`). Keys the per-expert weight tables.
//! - [`RoutingLabel`] - the per-round coarse classification of what the query
//!   needs (`analytic | creative | critical | plan`), a.k.a. the "vibe".

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reasoning posture for a deliberation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundMode {
    /// Breadth-first: generate options and variants
    Explore,
    /// Check claims, look for evidence (default)
    #[default]
    Verify,
    /// Red-team: hunt for failure modes and contradictions
    Attack,
    /// Produce an actionable step-by-step plan
    Plan,
}

impl RoundMode {
    pub const ALL: [RoundMode; 4] = [
        RoundMode::Explore,
        RoundMode::Verify,
        RoundMode::Attack,
        RoundMode::Plan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoundMode::Explore => "explore",
            RoundMode::Verify => "verify",
            RoundMode::Attack => "attack",
            RoundMode::Plan => "plan",
        }
    }

    /// Routing label assumed when the router cannot classify a query.
    pub fn default_routing_label(&self) -> RoutingLabel {
        match self {
            RoundMode::Explore => RoutingLabel::Creative,
            RoundMode::Verify => RoutingLabel::Analytic,
            RoundMode::Attack => RoutingLabel::Critical,
            RoundMode::Plan => RoutingLabel::Plan,
        }
    }
}

impl fmt::Display for RoundMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RoundMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "explore" => Ok(RoundMode::Explore),
            "verify" => Ok(RoundMode::Verify),
            "attack" => Ok(RoundMode::Attack),
            "plan" => Ok(RoundMode::Plan),
            _ => Err(DomainError::InvalidMode(s.to_string())),
        }
    }
}

/// Coarse classification of the reasoning a query needs ("vibe").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingLabel {
    /// Factual, precise answer or synthesis
    Analytic,
    /// Ideas, variants, brainstorm
    Creative,
    /// Red-team, risks, failure modes
    Critical,
    /// Step-by-step action plan
    Plan,
}

impl RoutingLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingLabel::Analytic => "analytic",
            RoutingLabel::Creative => "creative",
            RoutingLabel::Critical => "critical",
            RoutingLabel::Plan => "plan",
        }
    }

    /// Lenient parse of router output: the first known label word wins.
    ///
    /// Routers frequently wrap the label in prose or punctuation
    /// (`"Label: critical."`), so this scans tokens instead of requiring an
    /// exact match.
    pub fn find_in(text: &str) -> Option<Self> {
        text.split(|c: char| !c.is_ascii_alphabetic())
            .filter(|w| !w.is_empty())
            .find_map(|w| w.parse().ok())
    }
}

impl fmt::Display for RoutingLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RoutingLabel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "analytic" => Ok(RoutingLabel::Analytic),
            "creative" => Ok(RoutingLabel::Creative),
            "critical" => Ok(RoutingLabel::Critical),
            "plan" => Ok(RoutingLabel::Plan),
            _ => Err(DomainError::InvalidRoutingLabel(s.to_string())),
        }
    }
}
