//! Use cases
//!
//! Application-level operations that orchestrate domain logic. The stage
//! modules are the building blocks of [`run_deliberation`].

pub(crate) mod execute_experts;
pub(crate) mod gate_experts;
pub(crate) mod judge_candidates;
pub mod persist_hints;
pub(crate) mod route_query;
pub mod run_deliberation;
pub(crate) mod shared;
