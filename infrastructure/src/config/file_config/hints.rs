//! Hint cache configuration from TOML (`[hints]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileHintsConfig {
    /// JSON file hints are loaded from and saved to; unset disables the cache
    pub cache: Option<String>,
}
