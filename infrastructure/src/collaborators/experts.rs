//! Expert panel adapter

use super::ask;
use async_trait::async_trait;
use deliberate_application::{CollaboratorError, ExpertPort, LlmGateway};
use deliberate_domain::{
    ExpertContext, ExpertDescriptor, GateDecision, PromptTemplate, prompt::parsing,
};
use std::sync::Arc;

pub struct LlmExperts<G: LlmGateway> {
    gateway: Arc<G>,
}

impl<G: LlmGateway> LlmExperts<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl<G: LlmGateway + 'static> ExpertPort for LlmExperts<G> {
    async fn gate(
        &self,
        expert: &ExpertDescriptor,
        ctx: &ExpertContext,
    ) -> Result<GateDecision, CollaboratorError> {
        let system = PromptTemplate::expert_system(expert.name(), expert.persona());
        let reply = ask(self.gateway.as_ref(), &system, &PromptTemplate::gate_prompt(ctx)).await?;
        Ok(parsing::parse_gate_response(&reply)?)
    }

    async fn answer(
        &self,
        expert: &ExpertDescriptor,
        ctx: &ExpertContext,
    ) -> Result<String, CollaboratorError> {
        let system = PromptTemplate::expert_system(expert.name(), expert.persona());
        let reply = ask(self.gateway.as_ref(), &system, &PromptTemplate::answer_prompt(ctx)).await?;
        Ok(parsing::parse_answer_response(&reply)?)
    }
}
