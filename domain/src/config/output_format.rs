//! Output format value object

use serde::{Deserialize, Serialize};

/// How a deliberation outcome is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Per-round report followed by the final answer
    Full,
    /// Only the final answer (default)
    #[default]
    Answer,
    /// The outcome, trace included, as JSON
    Json,
}
