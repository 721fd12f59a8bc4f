//! Expert panel domain
//!
//! - [`context::ExpertContext`] - what an expert sees for one round
//! - [`descriptor::ExpertDescriptor`] - name, persona, per-mode weights
//! - [`registry::ExpertRegistry`] - the fixed-order panel
//! - [`gate`] - gate decisions and the threshold/fallback candidate filter
//! - [`role`] - hint accumulator key normalization

pub mod context;
pub mod descriptor;
pub mod gate;
pub mod registry;
pub mod role;

pub use context::ExpertContext;
pub use descriptor::ExpertDescriptor;
pub use gate::{GateDecision, GateResult, ScoredCandidate, gated_candidates, parse_coverage_tags};
pub use registry::ExpertRegistry;
pub use role::normalize_role_key;
