//! Judge adapter

use super::ask;
use async_trait::async_trait;
use deliberate_application::{CollaboratorError, JudgePort, LlmGateway};
use deliberate_domain::{ExpertAnswer, PromptTemplate, RawJudgeOutput, prompt::parsing};
use std::sync::Arc;

pub struct LlmJudge<G: LlmGateway> {
    gateway: Arc<G>,
}

impl<G: LlmGateway> LlmJudge<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl<G: LlmGateway + 'static> JudgePort for LlmJudge<G> {
    async fn rank(
        &self,
        question: &str,
        _candidates: &[ExpertAnswer],
        payload: &str,
    ) -> Result<RawJudgeOutput, CollaboratorError> {
        let reply = ask(
            self.gateway.as_ref(),
            PromptTemplate::judge_system(),
            &PromptTemplate::judge_prompt(question, payload),
        )
        .await?;
        Ok(parsing::parse_judge_response(&reply))
    }

    async fn compare(
        &self,
        question: &str,
        candidates: &[ExpertAnswer],
    ) -> Result<RawJudgeOutput, CollaboratorError> {
        let reply = ask(
            self.gateway.as_ref(),
            PromptTemplate::judge_system(),
            &PromptTemplate::compare_prompt(question, candidates),
        )
        .await?;
        Ok(parsing::parse_judge_response(&reply))
    }
}
