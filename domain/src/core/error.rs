//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid round mode: {0}")]
    InvalidMode(String),

    #[error("Invalid routing label: {0}")]
    InvalidRoutingLabel(String),

    #[error("Malformed output in field '{field}': {reason}")]
    MalformedOutput { field: String, reason: String },

    #[error("Unknown candidate label: {0}")]
    UnknownLabel(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Shorthand for a [`DomainError::MalformedOutput`]
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        DomainError::MalformedOutput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }

    /// Malformed collaborator output, including rankings naming unknown labels
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            DomainError::MalformedOutput { .. } | DomainError::UnknownLabel(_)
        )
    }
}
