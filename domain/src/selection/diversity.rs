//! Diversity-aware top-k selection (greedy MMR).
//!
//! # Algorithm
//!
//! ```text
//! selected = []
//! while |selected| < top_k and candidates remain:
//!     for c in remaining:
//!         value(c) = c.score - λ · max_{s ∈ selected} jaccard(c.tags, s.tags)
//!     move argmax value (first encountered on ties) into selected
//! ```
//!
//! This is a one-shot greedy approximation of a facility-location style
//! diversity objective. It does not backtrack and does not guarantee the
//! globally optimal subset. That is a known approximation, not a bug: the
//! greedy pass is deterministic for identical inputs, and replacing it with a
//! search or sampling scheme would give up that reproducibility.

use crate::expert::gate::ScoredCandidate;
use crate::selection::similarity::jaccard;
use serde::{Deserialize, Serialize};

/// Ordered candidates chosen for execution.
///
/// The order is *selection* order, not a quality ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    selected: Vec<ScoredCandidate>,
}

impl SelectionResult {
    pub fn candidates(&self) -> &[ScoredCandidate] {
        &self.selected
    }

    pub fn into_candidates(self) -> Vec<ScoredCandidate> {
        self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Expert names in selection order
    pub fn expert_names(&self) -> Vec<&str> {
        self.selected.iter().map(|c| c.expert.as_str()).collect()
    }
}

/// Greedy MMR selector with session-fixed `top_k` and `λ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiversitySelector {
    top_k: usize,
    lambda: f64,
}

impl DiversitySelector {
    pub fn new(top_k: usize, lambda: f64) -> Self {
        Self { top_k, lambda }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Pick up to `top_k` candidates, penalising tag overlap with earlier picks.
    pub fn select(&self, candidates: Vec<ScoredCandidate>) -> SelectionResult {
        let mut remaining = candidates;
        let mut selected: Vec<ScoredCandidate> = Vec::with_capacity(self.top_k);

        while selected.len() < self.top_k && !remaining.is_empty() {
            let mut best_idx = 0;
            let mut best_value = f64::NEG_INFINITY;

            for (idx, candidate) in remaining.iter().enumerate() {
                let value = candidate.score - self.lambda * Self::redundancy(candidate, &selected);
                // Strict comparison keeps the first-encountered candidate on ties
                if value > best_value {
                    best_value = value;
                    best_idx = idx;
                }
            }

            selected.push(remaining.remove(best_idx));
        }

        SelectionResult { selected }
    }

    fn redundancy(candidate: &ScoredCandidate, selected: &[ScoredCandidate]) -> f64 {
        selected
            .iter()
            .map(|s| jaccard(&candidate.tags, &s.tags))
            .fold(0.0, f64::max)
    }
}
