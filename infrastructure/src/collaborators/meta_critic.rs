//! Meta-critic adapter

use super::ask;
use async_trait::async_trait;
use deliberate_application::{CollaboratorError, LlmGateway, MetaCriticPort, MetaRequest};
use deliberate_domain::{MetaEvaluation, PromptTemplate, prompt::parsing};
use std::sync::Arc;

pub struct LlmMetaCritic<G: LlmGateway> {
    gateway: Arc<G>,
}

impl<G: LlmGateway> LlmMetaCritic<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl<G: LlmGateway + 'static> MetaCriticPort for LlmMetaCritic<G> {
    async fn evaluate(&self, request: &MetaRequest) -> Result<MetaEvaluation, CollaboratorError> {
        let prompt = PromptTemplate::meta_prompt(
            &request.query,
            &request.goal,
            request.mode.as_str(),
            request.routing_label.as_str(),
            &request.answer,
            &request.rationale,
            &request.summary,
            &request.roles,
        );
        let reply = ask(self.gateway.as_ref(), PromptTemplate::meta_system(), &prompt).await?;
        Ok(parsing::parse_meta_response(&reply)?)
    }
}
