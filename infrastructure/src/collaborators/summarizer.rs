//! Running-summary adapter

use super::ask;
use async_trait::async_trait;
use deliberate_application::{CollaboratorError, LlmGateway, SummarizerPort};
use deliberate_domain::{Message, PromptTemplate, prompt::parsing};
use std::sync::Arc;

const SYSTEM: &str = "You keep a compact running summary of a multi-round expert discussion.";

pub struct LlmSummarizer<G: LlmGateway> {
    gateway: Arc<G>,
}

impl<G: LlmGateway> LlmSummarizer<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl<G: LlmGateway + 'static> SummarizerPort for LlmSummarizer<G> {
    async fn summarize(
        &self,
        history: &[Message],
        latest_answer: &str,
    ) -> Result<String, CollaboratorError> {
        let prompt = PromptTemplate::summarize_prompt(history, latest_answer);
        let reply = ask(self.gateway.as_ref(), SYSTEM, &prompt).await?;
        Ok(parsing::parse_summary_response(&reply)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::test_support::ScriptedGateway;

    #[tokio::test]
    async fn test_summarize() {
        let gateway = Arc::new(ScriptedGateway::replying(&["SUMMARY: The panel agrees."]));
        let summarizer = LlmSummarizer::new(gateway);
        let history = vec![Message::user("Q"), Message::assistant("A")];
        assert_eq!(
            summarizer.summarize(&history, "A").await.unwrap(),
            "The panel agrees."
        );
    }
}
