//! Error types for the chat-completions adapter

use deliberate_application::{GatewayError, is_quota_message};
use thiserror::Error;

/// Result type alias for chat-completions operations
pub type Result<T> = std::result::Result<T, ChatError>;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Response had no message content")]
    EmptyResponse,
}

impl From<ChatError> for GatewayError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::Transport(inner) if inner.is_timeout() => GatewayError::Timeout,
            ChatError::Transport(inner) => GatewayError::ConnectionError(inner.to_string()),
            ChatError::Status { status, body } if status == 429 || is_quota_message(&body) => {
                GatewayError::QuotaExhausted(format!("HTTP {}: {}", status, body))
            }
            ChatError::Status { status, body } => {
                GatewayError::RequestFailed(format!("HTTP {}: {}", status, body))
            }
            ChatError::EmptyResponse => {
                GatewayError::InvalidResponse("no message content".to_string())
            }
        }
    }
}
