//! Judge domain
//!
//! - [`verdict`] - candidate answers, raw judge output, normalized verdict
//! - [`parsing`] - the normalization ladder and ranking validation

pub mod parsing;
pub mod verdict;

pub use parsing::{canonical_label, find_ranking_in, normalize_verdict, parse_ranking};
pub use verdict::{ExpertAnswer, JudgeVerdict, RawJudgeOutput, VerdictSource};
