//! Configuration loading for deliberate
//!
//! File I/O and merging of configuration from multiple sources, plus
//! provider settings from the environment. File priority (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./deliberate.toml` or `./.deliberate.toml`
//! 3. Global: `<config dir>/deliberate/config.toml`
//! 4. Default values

mod file_config;
mod loader;
mod provider_settings;

pub use file_config::{
    FileConfig, FileDeliberationConfig, FileHintsConfig, FileLoggingConfig, FileOutputConfig,
    FileProviderConfig, FileReplConfig,
};
pub use loader::ConfigLoader;
pub use provider_settings::{DEFAULT_MODEL, ProviderConfigError, ProviderSettings};
