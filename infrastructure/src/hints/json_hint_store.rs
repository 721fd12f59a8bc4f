//! JSON file hint cache.
//!
//! The file holds a single [`HintSnapshot`] object. A missing file loads as
//! `None`; parent directories are created on save.

use deliberate_application::{HintStore, HintStoreError};
use deliberate_domain::HintSnapshot;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct JsonHintStore {
    path: PathBuf,
}

impl JsonHintStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HintStore for JsonHintStore {
    fn load(&self) -> Result<Option<HintSnapshot>, HintStoreError> {
        if !self.path.exists() {
            debug!("No hint cache at {}", self.path.display());
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        let snapshot: HintSnapshot = serde_json::from_str(&content)
            .map_err(|e| HintStoreError::Format(format!("{}: {}", self.path.display(), e)))?;
        Ok(Some(snapshot.normalized()))
    }

    fn save(&self, snapshot: &HintSnapshot) -> Result<(), HintStoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| HintStoreError::Format(e.to_string()))?;
        std::fs::write(&self.path, json)?;
        debug!("Saved hints to {}", self.path.display());
        Ok(())
    }
}
