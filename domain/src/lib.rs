//! Domain layer for deliberate
//!
//! This crate contains the core logic of multi-round expert deliberation.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Round pipeline
//!
//! Each round of a session runs the same pipeline:
//!
//! 1. **Route**: classify the query into a [`RoutingLabel`]
//! 2. **Gate**: every registry expert decides whether to answer
//!    ([`gated_candidates`] applies the threshold and the fallback)
//! 3. **Select**: [`DiversitySelector`] picks a relevant, diverse top-k
//! 4. **Execute**: selected experts answer
//! 5. **Judge**: the ranking is normalized by [`normalize_verdict`]
//! 6. **Summarize / meta-evaluate**: update [`OrchestratorState`]
//!
//! ## Round state machine
//!
//! A session stays [`SessionStatus::Running`] until the meta-critic reports
//! an irreducible truth or a contradiction, or the round budget runs out.

pub mod config;
pub mod core;
pub mod deliberation;
pub mod expert;
pub mod judge;
pub mod prompt;
pub mod selection;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::{
    error::DomainError,
    mode::{RoundMode, RoutingLabel},
    query::Query,
    string::{append_line, truncate},
};
pub use deliberation::{
    DEFAULT_GOAL, DeliberationOutcome, HintSnapshot, Message, MetaEvaluation, MetaScores,
    OrchestratorState, Role, RoundRecord, SessionStatus, StopLabel, Trace,
};
pub use expert::{
    ExpertContext, ExpertDescriptor, ExpertRegistry, GateDecision, GateResult, ScoredCandidate,
    gated_candidates, normalize_role_key, parse_coverage_tags,
};
pub use judge::{ExpertAnswer, JudgeVerdict, RawJudgeOutput, VerdictSource, normalize_verdict};
pub use prompt::PromptTemplate;
pub use selection::{DiversitySelector, SelectionResult, jaccard};
