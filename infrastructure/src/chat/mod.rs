//! OpenAI-compatible chat-completions adapter
//!
//! Implements LlmGateway over HTTP for OpenAI, Anthropic, Gemini,
//! OpenRouter, Databricks and local Ollama endpoints.

pub mod error;
pub mod gateway;
pub mod protocol;
pub mod session;
