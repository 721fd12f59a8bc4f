//! Chat-completions LLM Gateway implementation

use crate::chat::session::ChatSession;
use crate::config::ProviderSettings;
use async_trait::async_trait;
use deliberate_application::{GatewayError, LlmGateway, LlmSession};
use std::sync::Arc;
use tracing::info;

/// LLM Gateway for any OpenAI-compatible chat-completions endpoint
pub struct ChatCompletionsGateway {
    client: reqwest::Client,
    settings: Arc<ProviderSettings>,
    model_id: String,
}

impl ChatCompletionsGateway {
    pub fn new(settings: ProviderSettings) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        info!(
            "ChatCompletionsGateway initialized for {} at {}",
            settings.model_id(),
            settings.api_base
        );

        Ok(Self {
            client,
            model_id: settings.model_id(),
            settings: Arc::new(settings),
        })
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }
}

#[async_trait]
impl LlmGateway for ChatCompletionsGateway {
    fn model(&self) -> &str {
        &self.model_id
    }

    async fn create_session_with_system_prompt(
        &self,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(ChatSession::new(
            self.client.clone(),
            Arc::clone(&self.settings),
            system_prompt,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ProviderSettings {
        ProviderSettings {
            provider: "ollama_chat".to_string(),
            model: "llama3.2".to_string(),
            api_base: "http://localhost:11434/v1".to_string(),
            api_key: None,
            temperature: 0.2,
            max_tokens: 256,
        }
    }

    #[tokio::test]
    async fn test_gateway_creates_sessions_without_network() {
        let gateway = ChatCompletionsGateway::new(settings()).unwrap();
        assert_eq!(gateway.model(), "ollama_chat/llama3.2");
        assert!(
            gateway
                .create_session_with_system_prompt("system")
                .await
                .is_ok()
        );
    }
}
