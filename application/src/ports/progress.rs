//! Progress notification port
//!
//! Defines the interface for reporting progress during a deliberation.

use deliberate_domain::RoundRecord;
use std::fmt;

/// Stage of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Route,
    Gate,
    Execute,
    Judge,
    Summarize,
    MetaEvaluate,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Route => "route",
            Stage::Gate => "gate",
            Stage::Execute => "execute",
            Stage::Judge => "judge",
            Stage::Summarize => "summarize",
            Stage::MetaEvaluate => "meta",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Stage::Route => "🧭",
            Stage::Gate => "🚪",
            Stage::Execute => "💬",
            Stage::Judge => "⚖️",
            Stage::Summarize => "📝",
            Stage::MetaEvaluate => "🔍",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Callback for progress updates during a deliberation
///
/// Implementations live in the presentation layer.
pub trait ProgressNotifier: Send + Sync {
    /// Called when a round starts
    fn on_round_start(&self, round: u32, max_rounds: u32);

    /// Called when a stage starts; `total_tasks` is the number of calls it makes
    fn on_stage_start(&self, stage: Stage, total_tasks: usize);

    /// Called when one call within a stage completes
    fn on_task_complete(&self, stage: Stage, name: &str, success: bool);

    /// Called when a stage completes
    fn on_stage_complete(&self, stage: Stage);

    /// Called after a round has been committed
    fn on_round_complete(&self, _record: &RoundRecord) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_round_start(&self, _round: u32, _max_rounds: u32) {}
    fn on_stage_start(&self, _stage: Stage, _total_tasks: usize) {}
    fn on_task_complete(&self, _stage: Stage, _name: &str, _success: bool) {}
    fn on_stage_complete(&self, _stage: Stage) {}
}
