//! Routing-label adapter

use super::ask;
use async_trait::async_trait;
use deliberate_application::{CollaboratorError, LlmGateway, RouteRequest, RouterPort};
use deliberate_domain::{PromptTemplate, RoutingLabel, prompt::parsing};
use std::sync::Arc;

const SYSTEM: &str = "You route questions to the kind of thinking they need.";

pub struct LlmRouter<G: LlmGateway> {
    gateway: Arc<G>,
}

impl<G: LlmGateway> LlmRouter<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl<G: LlmGateway + 'static> RouterPort for LlmRouter<G> {
    async fn route(&self, request: &RouteRequest) -> Result<RoutingLabel, CollaboratorError> {
        let prompt = PromptTemplate::route_prompt(
            &request.query,
            &request.history,
            &request.goal,
            request.mode.as_str(),
            &request.guidance,
        );
        let reply = ask(self.gateway.as_ref(), SYSTEM, &prompt).await?;
        Ok(parsing::parse_route_response(&reply)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::test_support::ScriptedGateway;
    use deliberate_domain::RoundMode;

    fn request(guidance: &str) -> RouteRequest {
        RouteRequest {
            query: "How do we roll this out?".to_string(),
            history: vec![],
            goal: "g".to_string(),
            mode: RoundMode::Plan,
            guidance: guidance.to_string(),
        }
    }

    #[tokio::test]
    async fn test_route_with_guidance() {
        let gateway = Arc::new(ScriptedGateway::replying(&["LABEL: plan"]));
        let router = LlmRouter::new(Arc::clone(&gateway));

        let label = router.route(&request("prefer plans")).await.unwrap();
        assert_eq!(label, RoutingLabel::Plan);
        assert!(gateway.last_prompt().contains("prefer plans"));
    }

    #[tokio::test]
    async fn test_unroutable_reply() {
        let gateway = Arc::new(ScriptedGateway::replying(&["hmm"]));
        let router = LlmRouter::new(gateway);
        assert!(router.route(&request("")).await.is_err());
    }
}
