//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod deliberation;
mod hints;
mod logging;
mod output;
mod provider;
mod repl;

pub use deliberation::FileDeliberationConfig;
pub use hints::FileHintsConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use provider::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, FileProviderConfig};
pub use repl::FileReplConfig;

use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Round loop and gating settings
    pub deliberation: FileDeliberationConfig,
    /// Model provider settings
    pub provider: FileProviderConfig,
    /// Hint cache settings
    pub hints: FileHintsConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Interactive mode settings
    pub repl: FileReplConfig,
    /// Log destinations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the numeric settings, returning one message per problem.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if let Err(e) = self.deliberation.to_params().validate() {
            issues.push(format!("[deliberation] {}", e));
        }
        if !(0.0..=2.0).contains(&self.provider.temperature) {
            issues.push(format!(
                "[provider] temperature must be within [0, 2], got {}",
                self.provider.temperature
            ));
        }
        if self.provider.max_tokens == 0 {
            issues.push("[provider] max_tokens must be at least 1".to_string());
        }
        issues
    }
}
