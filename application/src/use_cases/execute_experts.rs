//! Execution stage: selected experts answer the query.

use crate::ports::collaborators::ExpertPort;
use crate::ports::progress::Stage;
use crate::use_cases::run_deliberation::RunDeliberationError;
use crate::use_cases::shared::{StageEnv, fatal_error, with_timeout};
use deliberate_domain::{ExpertAnswer, ExpertContext, ExpertDescriptor};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// One selected expert and the hint it answers with
pub(crate) struct ExecutionJob {
    pub expert: ExpertDescriptor,
    pub hint: String,
}

/// Run the selected experts concurrently.
///
/// Answers keep selection order. Failed answers are dropped; if none
/// succeed the round fails with [`RunDeliberationError::AllExpertsFailed`].
pub(crate) async fn execute_experts(
    env: &StageEnv<'_>,
    port: &Arc<dyn ExpertPort>,
    jobs: Vec<ExecutionJob>,
    ctx: &ExpertContext,
) -> Result<Vec<ExpertAnswer>, RunDeliberationError> {
    env.progress.on_stage_start(Stage::Execute, jobs.len());

    let mut answers: Vec<Option<ExpertAnswer>> = vec![None; jobs.len()];
    let mut join_set = JoinSet::new();

    for (index, job) in jobs.into_iter().enumerate() {
        let port = Arc::clone(port);
        let ctx = ctx.with_hint(job.hint);
        let expert = job.expert;
        let timeout = env.timeout;

        join_set.spawn(async move {
            let result = with_timeout(timeout, port.answer(&expert, &ctx)).await;
            (index, expert, result)
        });
    }

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
            Ok((index, expert, Ok(text))) => {
                info!("Expert {} answered", expert.name());
                env.progress.on_task_complete(Stage::Execute, expert.name(), true);
                answers[index] = Some(ExpertAnswer::new(expert.name(), text));
            }
            Ok((_, expert, Err(e))) => {
                if let Some(fatal) = fatal_error(&e) {
                    join_set.abort_all();
                    return Err(fatal);
                }
                warn!("Expert {} failed to answer, dropping candidate: {}", expert.name(), e);
                env.progress.on_task_complete(Stage::Execute, expert.name(), false);
            }
            Err(e) => {
                warn!("Task join error: {}", e);
            }
        }
    }

    env.progress.on_stage_complete(Stage::Execute);

    let answers: Vec<ExpertAnswer> = answers.into_iter().flatten().collect();
    if answers.is_empty() {
        return Err(RunDeliberationError::AllExpertsFailed);
    }
    Ok(answers)
}
