//! Deliberation parameters - round loop and stage control.
//!
//! [`DeliberationParams`] groups the static parameters that control
//! [`RunDeliberationUseCase`](crate::use_cases::run_deliberation::RunDeliberationUseCase).
//! File and CLI configuration are folded into this type by the outer layers.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_MAX_ROUNDS: u32 = 3;
pub const DEFAULT_TOP_K: usize = 3;
pub const DEFAULT_GATE_MIN_CONF: f64 = 0.35;
pub const DEFAULT_GATE_LAMBDA: f64 = 0.5;
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamsError {
    #[error("max_rounds must be at least 1")]
    ZeroRounds,

    #[error("top_k must be at least 1")]
    ZeroTopK,

    #[error("gate_min_conf must be within [0, 1], got {0}")]
    GateThresholdOutOfRange(f64),

    #[error("gate_lambda must be a non-negative number, got {0}")]
    NegativeLambda(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationParams {
    /// Upper bound on rounds per query
    pub max_rounds: u32,
    /// Selector capacity
    pub top_k: usize,
    /// Minimum gate confidence for an expert to be considered
    pub gate_min_conf: f64,
    /// Selector redundancy penalty
    pub gate_lambda: f64,
    /// Per-call timeout applied to every collaborator call
    pub call_timeout: Option<Duration>,
    /// Keep the labeled candidate block sent to the judge in each record
    pub keep_judge_payload: bool,
}

impl Default for DeliberationParams {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            top_k: DEFAULT_TOP_K,
            gate_min_conf: DEFAULT_GATE_MIN_CONF,
            gate_lambda: DEFAULT_GATE_LAMBDA,
            call_timeout: Some(DEFAULT_CALL_TIMEOUT),
            keep_judge_payload: false,
        }
    }
}

impl DeliberationParams {
    // ==================== Builder Methods ====================

    pub fn with_max_rounds(mut self, max: u32) -> Self {
        self.max_rounds = max;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_gate_min_conf(mut self, min_conf: f64) -> Self {
        self.gate_min_conf = min_conf;
        self
    }

    pub fn with_gate_lambda(mut self, lambda: f64) -> Self {
        self.gate_lambda = lambda;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_judge_payload(mut self, keep: bool) -> Self {
        self.keep_judge_payload = keep;
        self
    }

    // ==================== Validation ====================

    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.max_rounds == 0 {
            return Err(ParamsError::ZeroRounds);
        }
        if self.top_k == 0 {
            return Err(ParamsError::ZeroTopK);
        }
        if !self.gate_min_conf.is_finite() || !(0.0..=1.0).contains(&self.gate_min_conf) {
            return Err(ParamsError::GateThresholdOutOfRange(self.gate_min_conf));
        }
        if !self.gate_lambda.is_finite() || self.gate_lambda < 0.0 {
            return Err(ParamsError::NegativeLambda(self.gate_lambda));
        }
        Ok(())
    }
}
