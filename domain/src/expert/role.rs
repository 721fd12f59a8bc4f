//! Role keys for hint accumulators.
//!
//! Hints are stored per expert *role* (`"analyst"`, `"synthesizer"`, ...).
//! Keys coming from cached hint files or meta-critic output may use short
//! aliases or odd casing, so every read and write goes through
//! [`normalize_role_key`].

const ROLE_ALIASES: &[(&str, &str)] = &[("synth", "synthesizer")];

/// Lower-case a role key and resolve known aliases.
pub fn normalize_role_key(key: &str) -> String {
    let lowered = key.trim().to_lowercase();
    ROLE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or(lowered)
}
