//! Gating stage: ask every registered expert whether it should answer.

use crate::ports::collaborators::ExpertPort;
use crate::ports::progress::Stage;
use crate::use_cases::run_deliberation::RunDeliberationError;
use crate::use_cases::shared::{StageEnv, fatal_error, with_timeout};
use deliberate_domain::{ExpertContext, ExpertDescriptor, GateDecision, GateResult};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Gate all experts concurrently.
///
/// Results come back in the order of `experts`. A failed or malformed gate
/// call counts as "no" for that expert.
pub(crate) async fn gate_experts(
    env: &StageEnv<'_>,
    port: &Arc<dyn ExpertPort>,
    experts: &[ExpertDescriptor],
    ctx: &ExpertContext,
    hint_for: impl Fn(&ExpertDescriptor) -> String,
) -> Result<Vec<GateResult>, RunDeliberationError> {
    env.progress.on_stage_start(Stage::Gate, experts.len());

    let mut join_set = JoinSet::new();
    for (index, expert) in experts.iter().enumerate() {
        let port = Arc::clone(port);
        let expert = expert.clone();
        let ctx = ctx.with_hint(hint_for(&expert));
        let timeout = env.timeout;

        join_set.spawn(async move {
            let result = with_timeout(timeout, port.gate(&expert, &ctx)).await;
            (index, expert, result)
        });
    }

    let mut results: Vec<GateResult> = experts
        .iter()
        .map(|e| GateResult::new(e.name(), GateDecision::decline()))
        .collect();

    loop {
        let joined = if let Some(token) = env.token {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    join_set.abort_all();
                    return Err(RunDeliberationError::Cancelled);
                }
                joined = join_set.join_next() => joined,
            }
        } else {
            join_set.join_next().await
        };

        let Some(joined) = joined else {
            break;
        };

        match joined {
            Ok((index, expert, Ok(decision))) => {
                debug!(
                    "Gate {}: respond={} confidence={:.2} tags={:?}",
                    expert.name(),
                    decision.respond,
                    decision.confidence,
                    decision.coverage_tags
                );
                env.progress.on_task_complete(Stage::Gate, expert.name(), true);
                results[index] = GateResult::new(expert.name(), decision);
            }
            Ok((_, expert, Err(e))) => {
                if let Some(fatal) = fatal_error(&e) {
                    join_set.abort_all();
                    return Err(fatal);
                }
                warn!("Gate call for {} failed, treating as 'no': {}", expert.name(), e);
                env.progress.on_task_complete(Stage::Gate, expert.name(), false);
            }
            Err(e) => {
                warn!("Task join error: {}", e);
            }
        }
    }

    env.progress.on_stage_complete(Stage::Gate);
    Ok(results)
}
