//! Provider settings resolved from the environment and the `[provider]` section.
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `DELIBERATE_LM` | `provider/model`, default `openai/gpt-4o-mini` |
//! | `DELIBERATE_API_BASE` | OpenAI-compatible base URL |
//! | `DELIBERATE_API_KEY` | API key; overrides provider keys |
//! | `OPENAI_API_KEY` etc. | per-provider keys |
//!
//! Environment variables win over the config file.

use super::file_config::FileProviderConfig;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

const ENV_MODEL: &str = "DELIBERATE_LM";
const ENV_API_BASE: &str = "DELIBERATE_API_BASE";
const ENV_API_KEY: &str = "DELIBERATE_API_KEY";

/// Key variable and default base URL per provider prefix
const PROVIDERS: &[(&str, Option<&str>, Option<&str>)] = &[
    ("openai", Some("OPENAI_API_KEY"), Some("https://api.openai.com/v1")),
    ("anthropic", Some("ANTHROPIC_API_KEY"), Some("https://api.anthropic.com/v1")),
    (
        "gemini",
        Some("GEMINI_API_KEY"),
        Some("https://generativelanguage.googleapis.com/v1beta/openai"),
    ),
    ("openrouter", Some("OPENROUTER_API_KEY"), Some("https://openrouter.ai/api/v1")),
    ("databricks", Some("DATABRICKS_API_KEY"), None),
    ("ollama_chat", None, Some("http://localhost:11434/v1")),
];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderConfigError {
    #[error("{model}: missing API key. Set DELIBERATE_API_KEY or {key_env}.")]
    MissingApiKey { model: String, key_env: String },

    #[error("{model}: no API base URL known for this provider. Set DELIBERATE_API_BASE.")]
    MissingApiBase { model: String },

    #[error("Invalid model identifier '{0}': expected provider/model")]
    InvalidModel(String),
}

/// Fully resolved settings for the HTTP gateway
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    /// Provider prefix, e.g. `openai`
    pub provider: String,
    /// Model name sent to the API, e.g. `gpt-4o-mini`
    pub model: String,
    pub api_base: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ProviderSettings {
    /// Resolve from the process environment.
    pub fn from_env(file: &FileProviderConfig) -> Result<Self, ProviderConfigError> {
        Self::resolve(file, |name| std::env::var(name).ok())
    }

    /// Resolve with an injectable environment lookup.
    pub fn resolve(
        file: &FileProviderConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ProviderConfigError> {
        let non_empty = |name: &str| env(name).filter(|v| !v.trim().is_empty());

        let model_id = non_empty(ENV_MODEL)
            .or_else(|| file.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let (provider, model) = model_id
            .split_once('/')
            .filter(|(p, m)| !p.is_empty() && !m.is_empty())
            .ok_or_else(|| ProviderConfigError::InvalidModel(model_id.clone()))?;

        let known = PROVIDERS.iter().find(|(name, _, _)| *name == provider);
        let provider_key_env = known.and_then(|(_, key, _)| *key);
        let requires_key = provider != "ollama_chat";

        let api_key = non_empty(ENV_API_KEY)
            .or_else(|| file.api_key_env.as_deref().and_then(|name| non_empty(name)))
            .or_else(|| provider_key_env.and_then(|name| non_empty(name)));
        if requires_key && api_key.is_none() {
            let key_env = file
                .api_key_env
                .as_deref()
                .or(provider_key_env)
                .unwrap_or("the provider key variable")
                .to_string();
            return Err(ProviderConfigError::MissingApiKey {
                model: model_id.clone(),
                key_env,
            });
        }

        let api_base = non_empty(ENV_API_BASE)
            .or_else(|| file.api_base.clone())
            .or_else(|| known.and_then(|(_, _, base)| base.map(str::to_string)))
            .ok_or_else(|| ProviderConfigError::MissingApiBase {
                model: model_id.clone(),
            })?;

        Ok(Self {
            provider: provider.to_string(),
            model: model.to_string(),
            api_base: normalize_api_base(&api_base),
            api_key,
            temperature: file.temperature,
            max_tokens: file.max_tokens,
        })
    }

    /// `provider/model` as configured
    pub fn model_id(&self) -> String {
        format!("{}/{}", self.provider, self.model)
    }
}

/// Trim trailing slashes; a bare Ollama host gets its `/v1` suffix.
fn normalize_api_base(base: &str) -> String {
    let trimmed = base.trim().trim_end_matches('/');
    if trimmed.ends_with(":11434") {
        format!("{}/v1", trimmed)
    } else {
        trimmed.to_string()
    }
}
