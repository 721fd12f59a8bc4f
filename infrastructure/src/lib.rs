//! Infrastructure layer for deliberate
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod chat;
pub mod collaborators;
pub mod config;
pub mod hints;
pub mod logging;

// Re-export commonly used types
pub use chat::{error::ChatError, gateway::ChatCompletionsGateway};
pub use collaborators::{
    LlmExperts, LlmJudge, LlmMetaCritic, LlmRouter, LlmSummarizer, llm_collaborators,
};
pub use config::{
    ConfigLoader, FileConfig, FileDeliberationConfig, FileHintsConfig, FileLoggingConfig,
    FileOutputConfig, FileProviderConfig, FileReplConfig, ProviderConfigError, ProviderSettings,
};
pub use hints::JsonHintStore;
pub use logging::JsonlConversationLogger;
