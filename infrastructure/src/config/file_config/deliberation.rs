//! Deliberation configuration from TOML (`[deliberation]` section)

use deliberate_application::DeliberationParams;
use deliberate_domain::RoundMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw deliberation settings; unset fields keep the built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDeliberationConfig {
    pub max_rounds: Option<u32>,
    pub top_k: Option<usize>,
    pub gate_min_conf: Option<f64>,
    pub gate_lambda: Option<f64>,
    /// Per-call timeout in seconds; `0` disables the timeout
    pub call_timeout_secs: Option<u64>,
    /// Session goal
    pub goal: Option<String>,
    /// Session mode
    pub mode: Option<RoundMode>,
}

impl FileDeliberationConfig {
    /// Fold file values over the defaults.
    pub fn to_params(&self) -> DeliberationParams {
        let defaults = DeliberationParams::default();
        let call_timeout = match self.call_timeout_secs {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.call_timeout,
        };
        DeliberationParams {
            max_rounds: self.max_rounds.unwrap_or(defaults.max_rounds),
            top_k: self.top_k.unwrap_or(defaults.top_k),
            gate_min_conf: self.gate_min_conf.unwrap_or(defaults.gate_min_conf),
            gate_lambda: self.gate_lambda.unwrap_or(defaults.gate_lambda),
            call_timeout,
            keep_judge_payload: defaults.keep_judge_payload,
        }
    }
}
