//! LLM Gateway port
//!
//! Defines the interface for sending prompts to a chat-completion provider.

use async_trait::async_trait;
use thiserror::Error;

/// Substrings in provider errors that mean the account is out of quota or
/// rate limited.
const QUOTA_MARKERS: &[&str] = &["insufficient_quota", "ratelimiterror", "rate limit", "429"];

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Quota exhausted: {0}")]
    QuotaExhausted(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,
}

impl GatewayError {
    /// Whether this error means the provider refused for quota or rate reasons.
    ///
    /// Besides the explicit variant, the error text of other variants is
    /// scanned for the markers providers put in their error bodies.
    pub fn is_quota_exhausted(&self) -> bool {
        match self {
            GatewayError::QuotaExhausted(_) => true,
            GatewayError::Timeout => false,
            other => is_quota_message(&other.to_string()),
        }
    }
}

/// Check an error message for quota / rate-limit markers.
pub fn is_quota_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    QUOTA_MARKERS.iter().any(|m| lower.contains(m))
}

/// Gateway for LLM communication
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Model identifier requests are sent to
    fn model(&self) -> &str;

    /// Create a new single-purpose session with a system prompt
    async fn create_session_with_system_prompt(
        &self,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError>;
}

/// An active LLM session
#[async_trait]
pub trait LlmSession: Send + Sync {
    /// Send a message and get the response text
    async fn send(&self, content: &str) -> Result<String, GatewayError>;
}
