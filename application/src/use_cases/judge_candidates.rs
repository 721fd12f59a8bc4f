//! Judge stage with its degradation ladder.
//!
//! 1. primary ranking call, normalized (structured ranking, then a `>` list
//!    found in the judge text, then best label only)
//! 2. primary call fails: comparison call over the first three candidates
//! 3. comparison fails too: the round is abandoned

use crate::ports::collaborators::JudgePort;
use crate::ports::progress::Stage;
use crate::use_cases::run_deliberation::RunDeliberationError;
use crate::use_cases::shared::{StageEnv, call_collaborator, fatal_error};
use deliberate_domain::{
    ExpertAnswer, JudgeVerdict, PromptTemplate, VerdictSource, normalize_verdict,
};
use tracing::{debug, warn};

/// Candidates shown to the comparison call
const COMPARE_LIMIT: usize = 3;

pub(crate) async fn judge_candidates(
    env: &StageEnv<'_>,
    judge: &dyn JudgePort,
    question: &str,
    candidates: &[ExpertAnswer],
    keep_payload: bool,
) -> Result<JudgeVerdict, RunDeliberationError> {
    env.progress.on_stage_start(Stage::Judge, 1);

    let labels: Vec<String> = candidates.iter().map(|c| c.expert_name.clone()).collect();
    let payload = PromptTemplate::candidate_block(candidates);

    let primary = call_collaborator(
        env.timeout,
        env.token,
        judge.rank(question, candidates, &payload),
    )
    .await;

    let verdict = match primary {
        Ok(raw) => normalize_verdict(raw, &labels, VerdictSource::Primary),
        Err(e) => {
            if let Some(fatal) = fatal_error(&e) {
                return Err(fatal);
            }
            warn!("Primary judge call failed, trying comparison: {}", e);
            let subset = &candidates[..candidates.len().min(COMPARE_LIMIT)];
            let subset_labels: Vec<String> =
                subset.iter().map(|c| c.expert_name.clone()).collect();

            match call_collaborator(env.timeout, env.token, judge.compare(question, subset)).await
            {
                Ok(raw) => {
                    let mut verdict = normalize_verdict(raw, &subset_labels, VerdictSource::Alternate);
                    verdict.source = VerdictSource::Alternate;
                    verdict
                }
                Err(e) => {
                    env.progress.on_task_complete(Stage::Judge, "judge", false);
                    return Err(fatal_error(&e)
                        .unwrap_or_else(|| RunDeliberationError::JudgeFailed(e.to_string())));
                }
            }
        }
    };

    for issue in &verdict.issues {
        warn!("Judge output: {}", issue);
    }
    debug!(
        "Judge verdict via {:?}: best='{}' ranking={:?}",
        verdict.source, verdict.best_label, verdict.ranking
    );

    env.progress.on_task_complete(Stage::Judge, "judge", true);
    env.progress.on_stage_complete(Stage::Judge);

    Ok(if keep_payload {
        verdict.with_payload(payload)
    } else {
        verdict
    })
}
