//! Persisted hint snapshot.
//!
//! The only state that outlives a session: accumulated router guidance and
//! per-role expert hints, stored as a small JSON object
//! `{"router_guidance": "...", "expert_hints": {"analyst": "..."}}`.

use crate::expert::role::normalize_role_key;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintSnapshot {
    #[serde(default)]
    pub router_guidance: String,
    #[serde(default)]
    pub expert_hints: BTreeMap<String, String>,
}

impl HintSnapshot {
    /// Trim every value and normalize role keys. Entries whose keys collide
    /// after normalization are newline-joined in key order.
    pub fn normalized(self) -> Self {
        let mut expert_hints: BTreeMap<String, String> = BTreeMap::new();
        for (key, hint) in self.expert_hints {
            let entry = expert_hints.entry(normalize_role_key(&key)).or_default();
            *entry = crate::core::string::append_line(entry, &hint);
        }
        Self {
            router_guidance: self.router_guidance.trim().to_string(),
            expert_hints,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.router_guidance.is_empty() && self.expert_hints.values().all(|h| h.is_empty())
    }
}
