//! Hint persistence port
//!
//! Accumulated hints can outlive a session. Loading and saving are
//! best-effort: callers log failures and carry on.

use deliberate_domain::HintSnapshot;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HintStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid hint data: {0}")]
    Format(String),
}

pub trait HintStore: Send + Sync {
    /// Load persisted hints; `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<HintSnapshot>, HintStoreError>;

    fn save(&self, snapshot: &HintSnapshot) -> Result<(), HintStoreError>;
}

/// Store used when no cache path is configured
pub struct NoHintStore;

impl HintStore for NoHintStore {
    fn load(&self) -> Result<Option<HintSnapshot>, HintStoreError> {
        Ok(None)
    }

    fn save(&self, _snapshot: &HintSnapshot) -> Result<(), HintStoreError> {
        Ok(())
    }
}
