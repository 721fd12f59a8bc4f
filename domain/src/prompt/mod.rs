//! Prompt domain
//!
//! Templates for every collaborator call and parsers for their responses.

pub mod parsing;
mod template;

pub use parsing::{
    parse_answer_response, parse_fields, parse_gate_response, parse_judge_response,
    parse_meta_response, parse_route_response, parse_summary_response,
};
pub use template::PromptTemplate;
