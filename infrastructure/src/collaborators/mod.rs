//! LLM-backed collaborator adapters
//!
//! Each adapter renders a prompt with [`PromptTemplate`], sends it through
//! an [`LlmGateway`] session and parses the reply with the domain parsers.
//! Unparseable replies surface as [`CollaboratorError::Malformed`].

mod experts;
mod judge;
mod meta_critic;
mod router;
mod summarizer;

pub use experts::LlmExperts;
pub use judge::LlmJudge;
pub use meta_critic::LlmMetaCritic;
pub use router::LlmRouter;
pub use summarizer::LlmSummarizer;

use deliberate_application::{CollaboratorError, Collaborators, LlmGateway};
use std::sync::Arc;
use tracing::trace;

/// Panel-wide guidance prepended to every system prompt.
pub const PANEL_GUIDANCE: &str = "Be concise but explicit. If uncertain, say 'unknown' and list what \
would verify it. Prefer bullets or numbered lists. Separate claims, evidence and caveats when useful. \
Never fabricate sources or data. Respect the given mode and goal. Keep replies under about 300 tokens.";

/// Wire every collaborator to the same gateway.
pub fn llm_collaborators<G: LlmGateway + 'static>(gateway: Arc<G>) -> Collaborators {
    Collaborators {
        experts: Arc::new(LlmExperts::new(Arc::clone(&gateway))),
        judge: Arc::new(LlmJudge::new(Arc::clone(&gateway))),
        summarizer: Arc::new(LlmSummarizer::new(Arc::clone(&gateway))),
        meta_critic: Arc::new(LlmMetaCritic::new(Arc::clone(&gateway))),
        router: Arc::new(LlmRouter::new(gateway)),
    }
}

/// One request/response exchange on a fresh session.
pub(crate) async fn ask<G: LlmGateway + ?Sized>(
    gateway: &G,
    system_prompt: &str,
    prompt: &str,
) -> Result<String, CollaboratorError> {
    let system = format!("{}\n\n{}", system_prompt, PANEL_GUIDANCE);
    let session = gateway.create_session_with_system_prompt(&system).await?;
    let reply = session.send(prompt).await?;
    trace!("LLM reply: {}", reply);
    Ok(reply)
}

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use deliberate_application::{GatewayError, LlmGateway, LlmSession};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Gateway replying with scripted texts, recording every prompt.
    #[derive(Default)]
    pub struct ScriptedGateway {
        pub replies: Arc<Mutex<VecDeque<Result<String, GatewayError>>>>,
        pub prompts: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl ScriptedGateway {
        pub fn replying(replies: &[&str]) -> Self {
            let gateway = Self::default();
            gateway
                .replies
                .lock()
                .unwrap()
                .extend(replies.iter().map(|r| Ok(r.to_string())));
            gateway
        }

        pub fn failing(error: GatewayError) -> Self {
            let gateway = Self::default();
            gateway.replies.lock().unwrap().push_back(Err(error));
            gateway
        }

        pub fn last_prompt(&self) -> String {
            self.prompts
                .lock()
                .unwrap()
                .last()
                .map(|(_, p)| p.clone())
                .unwrap_or_default()
        }
    }

    struct ScriptedSession {
        system: String,
        replies: Arc<Mutex<VecDeque<Result<String, GatewayError>>>>,
        prompts: Arc<Mutex<Vec<(String, String)>>>,
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        fn model(&self) -> &str {
            "test/model"
        }

        async fn create_session_with_system_prompt(
            &self,
            system_prompt: &str,
        ) -> Result<Box<dyn LlmSession>, GatewayError> {
            Ok(Box::new(ScriptedSession {
                system: system_prompt.to_string(),
                replies: Arc::clone(&self.replies),
                prompts: Arc::clone(&self.prompts),
            }))
        }
    }

    #[async_trait]
    impl LlmSession for ScriptedSession {
        async fn send(&self, content: &str) -> Result<String, GatewayError> {
            self.prompts
                .lock()
                .unwrap()
                .push((self.system.clone(), content.to_string()));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::RequestFailed("no scripted reply".into())))
        }
    }
}
