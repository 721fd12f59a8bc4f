//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for the diagnostic log file; unset logs to stderr only
    pub dir: Option<String>,
    /// JSONL conversation log path
    pub conversation_log: Option<String>,
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_logging_section() {
        let toml_str = r#"
[logging]
dir = "/tmp/deliberate"
conversation_log = "/tmp/deliberate/run.jsonl"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.logging.dir.as_deref(), Some("/tmp/deliberate"));
        assert!(config.logging.conversation_log.is_some());
    }
}
