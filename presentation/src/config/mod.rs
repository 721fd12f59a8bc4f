//! Presentation-level configuration
//!
//! Configuration for output formatting and REPL behavior.

use deliberate_domain::OutputFormat;
use std::path::PathBuf;

/// Output configuration for the presentation layer
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Print a report for every completed round
    pub verbose_rounds: bool,
}

impl OutputConfig {
    /// Whether live per-round reports should be printed.
    ///
    /// The full report already contains every round and JSON output must
    /// stay machine-readable, so only the answer format gets them.
    pub fn live_round_reports(&self) -> bool {
        self.verbose_rounds && self.format == OutputFormat::Answer
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            verbose_rounds: true,
        }
    }
}

/// REPL configuration for the presentation layer
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Show progress indicators
    pub show_progress: bool,
    /// Path to history file
    pub history_file: Option<PathBuf>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
        }
    }
}
