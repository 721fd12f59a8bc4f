//! Single-purpose chat session.
//!
//! Provides [`ChatSession`] which implements [`LlmSession`]: every `send`
//! is one chat-completions request carrying the session's system prompt.

use crate::chat::error::{ChatError, Result};
use crate::chat::protocol::{ChatMessage, ChatRequest, ChatResponse};
use crate::config::ProviderSettings;
use async_trait::async_trait;
use deliberate_application::{GatewayError, LlmSession};
use std::sync::Arc;
use tracing::debug;

pub struct ChatSession {
    client: reqwest::Client,
    settings: Arc<ProviderSettings>,
    system_prompt: String,
}

impl ChatSession {
    pub fn new(
        client: reqwest::Client,
        settings: Arc<ProviderSettings>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            client,
            settings,
            system_prompt: system_prompt.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.settings.api_base)
    }

    /// Sends a prompt and waits for the complete response.
    pub async fn ask(&self, content: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage::system(&self.system_prompt),
                ChatMessage::user(content),
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        debug!(
            "POST {} ({} prompt bytes)",
            self.endpoint(),
            content.len()
        );

        let mut builder = self.client.post(self.endpoint()).json(&request);
        if let Some(key) = &self.settings.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed.into_text().ok_or(ChatError::EmptyResponse)
    }
}

#[async_trait]
impl LlmSession for ChatSession {
    async fn send(&self, content: &str) -> std::result::Result<String, GatewayError> {
        self.ask(content).await.map_err(GatewayError::from)
    }
}
