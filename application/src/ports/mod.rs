//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod collaborators;
pub mod conversation_logger;
pub mod hint_store;
pub mod llm_gateway;
pub mod progress;
