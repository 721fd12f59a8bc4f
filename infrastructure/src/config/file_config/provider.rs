//! Provider configuration from TOML (`[provider]` section)

use serde::{Deserialize, Serialize};

pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Raw provider configuration. Environment variables take precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// `provider/model`, e.g. `openai/gpt-4o-mini`
    pub model: Option<String>,
    /// OpenAI-compatible base URL
    pub api_base: Option<String>,
    /// Environment variable to read the API key from
    pub api_key_env: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            model: None,
            api_base: None,
            api_key_env: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}
