//! Application layer for deliberate
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DeliberationParams, ParamsError};
pub use ports::{
    collaborators::{
        CollaboratorError, Collaborators, ExpertPort, JudgePort, MetaCriticPort, MetaRequest,
        RouteRequest, RouterPort, SummarizerPort,
    },
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    hint_store::{HintStore, HintStoreError, NoHintStore},
    llm_gateway::{GatewayError, LlmGateway, LlmSession, is_quota_message},
    progress::{NoProgress, ProgressNotifier, Stage},
};
pub use use_cases::persist_hints::{restore_hints, save_hints};
pub use use_cases::run_deliberation::{
    RunDeliberationError, RunDeliberationInput, RunDeliberationUseCase,
};
